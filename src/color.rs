use std::collections::HashMap;

use eframe::egui::Color32;
use plotters::style::RGBColor;

use crate::data::model::Session;

// ---------------------------------------------------------------------------
// Qualitative palette
// ---------------------------------------------------------------------------

/// Fixed 10-color qualitative palette (the Tableau 10 cycle). Groups past
/// the tenth reuse colors from the start.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

fn rgb(slot: usize) -> (u8, u8, u8) {
    PALETTE[slot % PALETTE.len()]
}

/// Palette color as an egui color (legend swatches).
pub fn egui_color(slot: usize) -> Color32 {
    let (r, g, b) = rgb(slot);
    Color32::from_rgb(r, g, b)
}

/// Palette color as a plotters color (chart bars).
pub fn chart_color(slot: usize) -> RGBColor {
    let (r, g, b) = rgb(slot);
    RGBColor(r, g, b)
}

// ---------------------------------------------------------------------------
// Color mapping: (course code, class section) → palette slot
// ---------------------------------------------------------------------------

/// Assigns one palette slot per (course code, class section) group, in the
/// order groups first appear in the session sequence. Callers pass sessions
/// in presentation order, which keeps the assignment identical across
/// reruns of the same query.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    slots: HashMap<(String, String), usize>,
    order: Vec<(String, String)>,
}

impl ColorMap {
    /// Build the group → slot assignment from an ordered session sequence.
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let mut map = ColorMap::default();
        for session in sessions {
            let key = (session.course_code.clone(), session.class_section.clone());
            if !map.slots.contains_key(&key) {
                map.slots.insert(key.clone(), map.order.len());
                map.order.push(key);
            }
        }
        map
    }

    /// Palette slot for a session's group.
    pub fn slot_for(&self, session: &Session) -> usize {
        self.slots
            .get(&(session.course_code.clone(), session.class_section.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Legend entries (label, swatch color) in assignment order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(slot, (code, section))| (format!("{code} {section}"), egui_color(slot)))
            .collect()
    }
}
