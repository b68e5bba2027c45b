use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::Term;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – query inputs and legend
// ---------------------------------------------------------------------------

/// Render the left query panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Class Timetable");
    ui.separator();

    ui.strong("Course codes");
    ui.add(
        egui::TextEdit::multiline(&mut state.course_input)
            .desired_rows(2)
            .hint_text("COMP3251, STAT4609, …"),
    );
    ui.add_space(4.0);

    ui.strong("Term");
    egui::ComboBox::from_id_salt("term_select")
        .selected_text(state.selected_term.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for term in Term::UI_ORDER {
                ui.selectable_value(&mut state.selected_term, term, term.to_string());
            }
        });
    ui.add_space(8.0);

    let can_query = state.load_failed.is_none();
    if ui
        .add_enabled(can_query, egui::Button::new("Get timetable"))
        .clicked()
    {
        state.run_query();
    }

    if let Some(err) = &state.load_failed {
        ui.add_space(8.0);
        ui.label(RichText::new(err).color(Color32::RED));
    }

    // ---- Legend for the current query ----
    let entries = state.color_map.legend_entries();
    if !entries.is_empty() {
        ui.separator();
        ui.strong("Courses");
        for (label, color) in entries {
            ui.label(RichText::new(label).color(color));
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(state.chart_png.is_some(), egui::Button::new("Export chart…"))
                .clicked()
            {
                export_chart_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.has_queried {
            ui.label(format!("{} sessions", state.sessions.len()));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_chart_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export timetable chart")
        .set_file_name("timetable.png")
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(path) = file {
        match state.export_chart(&path) {
            Ok(()) => {
                log::info!("exported chart to {}", path.display());
                state.status_message = Some(format!("Chart saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("failed to export chart: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
