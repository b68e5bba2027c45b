use std::path::Path;

use anyhow::Context;

use crate::chart;
use crate::color::ColorMap;
use crate::data::filter::{filter_timetable, parse_course_codes, TimetableQuery};
use crate::data::loader::cached_timetable;
use crate::data::model::{Session, Term};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Comma-separated course codes as typed by the user.
    pub course_input: String,

    /// Term the query runs against.
    pub selected_term: Term,

    /// Result of the last query, in presentation order.
    pub sessions: Vec<Session>,

    /// Color assignment for the last query's groups.
    pub color_map: ColorMap,

    /// Rendered chart for the last query, as encoded PNG bytes.
    pub chart_png: Option<Vec<u8>>,

    /// Bumped on every render so the UI's image cache reloads the bytes.
    pub chart_revision: u64,

    /// True once the user has run a query (drives the initial prompt).
    pub has_queried: bool,

    /// Informational notice or error shown in the UI.
    pub status_message: Option<String>,

    /// Set when the source timetable cannot be loaded. Fatal: queries stay
    /// disabled for the rest of the session.
    pub load_failed: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            course_input: "COMP3251, STAT4609, STAT3655".to_string(),
            selected_term: Term::Sem2,
            sessions: Vec::new(),
            color_map: ColorMap::default(),
            chart_png: None,
            chart_revision: 0,
            has_queried: false,
            status_message: None,
            load_failed: None,
        }
    }
}

impl AppState {
    /// Run the current query: filter the cached timetable and render the
    /// chart. An empty result clears the chart and shows a notice instead.
    pub fn run_query(&mut self) {
        if self.load_failed.is_some() {
            return;
        }
        self.has_queried = true;
        self.status_message = None;

        let table = match cached_timetable() {
            Ok(table) => table,
            Err(e) => {
                log::error!("failed to load timetable: {e}");
                self.load_failed = Some(format!("Error: {e}"));
                self.sessions.clear();
                self.chart_png = None;
                return;
            }
        };

        let query = TimetableQuery {
            course_codes: parse_course_codes(&self.course_input),
            term: self.selected_term,
        };
        log::info!(
            "querying {} course codes in term {}",
            query.course_codes.len(),
            query.term.number()
        );
        self.sessions = filter_timetable(table, &query);
        self.color_map = ColorMap::from_sessions(&self.sessions);

        if self.sessions.is_empty() {
            self.chart_png = None;
            self.status_message = Some(
                "No classes found for the entered course codes and selected term.".to_string(),
            );
            return;
        }

        match chart::render_png(&self.sessions, &self.color_map) {
            Ok(png) => {
                self.chart_png = Some(png);
                self.chart_revision += 1;
            }
            Err(e) => {
                log::error!("failed to render chart: {e:#}");
                self.chart_png = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// URI the chart bytes are registered under; changes on every render.
    pub fn chart_uri(&self) -> String {
        format!("bytes://timetable-{}.png", self.chart_revision)
    }

    /// Write the current chart PNG to `path`.
    pub fn export_chart(&self, path: &Path) -> anyhow::Result<()> {
        let png = self.chart_png.as_ref().context("no chart to export")?;
        std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
