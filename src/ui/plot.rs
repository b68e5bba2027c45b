use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Timetable view (central panel)
// ---------------------------------------------------------------------------

/// Render the query results: session table plus the chart image.
pub fn timetable_view(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_failed {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(err.as_str());
        });
        return;
    }

    if !state.has_queried {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Enter course codes and press \"Get timetable\"");
        });
        return;
    }

    if state.sessions.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No classes found for the entered course codes and selected term.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            session_table(ui, state);
            ui.add_space(8.0);

            if let Some(png) = &state.chart_png {
                ui.add(
                    egui::Image::from_bytes(state.chart_uri(), png.clone())
                        .max_width(ui.available_width()),
                );
            }
        });
}

fn session_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto(), 8)
        .header(20.0, |mut header| {
            for title in ["Term", "Course", "Title", "Section", "Day", "Start", "End", "Venue"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for session in &state.sessions {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(session.term.to_string());
                    });
                    row.col(|ui| {
                        ui.label(session.course_code.as_str());
                    });
                    row.col(|ui| {
                        ui.label(session.course_title.as_str());
                    });
                    row.col(|ui| {
                        ui.label(session.class_section.as_str());
                    });
                    row.col(|ui| {
                        ui.label(session.weekday.label());
                    });
                    row.col(|ui| {
                        ui.label(session.start_time.format("%H:%M").to_string());
                    });
                    row.col(|ui| {
                        ui.label(session.end_time.format("%H:%M").to_string());
                    });
                    row.col(|ui| {
                        ui.label(session.venue.as_str());
                    });
                });
            }
        });
}
