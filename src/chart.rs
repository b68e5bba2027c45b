use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::{chart_color, ColorMap};
use crate::data::model::{Session, Weekday};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// First hour shown on the chart; offsets are minutes past this hour.
const WINDOW_START_HOUR: i64 = 9;
/// Height of the visible window in minutes (ticks 9:00 through 18:00).
const WINDOW_MINUTES: f64 = 540.0;
/// Bar width in weekday units.
const BAR_WIDTH: f64 = 0.8;
/// Vertical distance between label lines, in minutes.
const LABEL_LINE_STEP: f64 = 16.0;

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

/// Minutes past 9:00. Values outside the 9:00–18:00 window are not clamped
/// and plot outside the visible axis range.
pub fn minute_offset(t: NaiveTime) -> f64 {
    ((t.hour() as i64 - WINDOW_START_HOUR) * 60 + t.minute() as i64) as f64
}

/// One bar of the chart, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionBar {
    /// x position: weekday number (Monday = 1). Saturday and Sunday fall
    /// outside the fixed [0.5, 5.5] x-range and clip against it.
    pub day: f64,
    pub start_min: f64,
    pub end_min: f64,
    /// Palette slot of the session's (course, section) group.
    pub palette_slot: usize,
    /// Centered label, one entry per line.
    pub label: [String; 3],
}

/// Pure layout step: one bar per session, colors resolved through the map.
pub fn layout(sessions: &[Session], colors: &ColorMap) -> Vec<SessionBar> {
    sessions
        .iter()
        .map(|session| SessionBar {
            day: session.weekday.number() as f64,
            start_min: minute_offset(session.start_time),
            end_min: minute_offset(session.end_time),
            palette_slot: colors.slot_for(session),
            label: [
                format!("{} {}", session.course_code, session.class_section),
                session.venue.clone(),
                format!(
                    "{} - {}",
                    session.start_time.format("%H:%M"),
                    session.end_time.format("%H:%M")
                ),
            ],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw the sessions as a weekly chart and return the encoded PNG.
pub fn render_png(sessions: &[Session], colors: &ColorMap) -> Result<Vec<u8>> {
    let bars = layout(sessions, colors);

    let mut rgb = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut rgb, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        draw_chart(&root, &bars)?;
        root.present().context("finalizing chart")?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&rgb, CHART_WIDTH, CHART_HEIGHT, ExtendedColorType::Rgb8)
        .context("encoding chart PNG")?;
    Ok(png)
}

fn draw_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, bars: &[SessionBar]) -> Result<()> {
    root.fill(&WHITE)?;

    let x_ticks: Vec<f64> = (1..=5).map(f64::from).collect();
    let y_ticks: Vec<f64> = (0..=WINDOW_MINUTES as i32).step_by(60).map(f64::from).collect();

    // Reversed y-range: smaller offsets (earlier times) at the top.
    let mut chart = ChartBuilder::on(root)
        .caption("Class Timetable", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0.5..5.5).with_key_points(x_ticks),
            (WINDOW_MINUTES..0.0).with_key_points(y_ticks),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Weekday")
        .y_desc("Time (from 9 AM)")
        .x_label_formatter(&weekday_tick)
        .y_label_formatter(&hour_tick)
        .draw()?;

    let label_style = ("sans-serif", 14)
        .into_font()
        .style(FontStyle::Bold)
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for bar in bars {
        let color = chart_color(bar.palette_slot);
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (bar.day - BAR_WIDTH / 2.0, bar.start_min),
                (bar.day + BAR_WIDTH / 2.0, bar.end_min),
            ],
            color.filled(),
        )))?;

        let mid = (bar.start_min + bar.end_min) / 2.0;
        chart.draw_series(bar.label.iter().enumerate().map(|(line_no, line)| {
            let y = mid + (line_no as f64 - 1.0) * LABEL_LINE_STEP;
            Text::new(line.clone(), (bar.day, y), label_style.clone())
        }))?;
    }
    Ok(())
}

fn weekday_tick(day: &f64) -> String {
    usize::try_from(day.round() as i64 - 1)
        .ok()
        .and_then(Weekday::from_index)
        .map(|weekday| weekday.label().to_string())
        .unwrap_or_default()
}

fn hour_tick(minutes: &f64) -> String {
    format!("{}:00", WINDOW_START_HOUR + *minutes as i64 / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Term;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn session(code: &str, section: &str, weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Session {
        Session {
            term: Term::Sem1,
            course_code: code.to_string(),
            course_title: format!("{code} title"),
            class_section: section.to_string(),
            weekday,
            start_time: start,
            end_time: end,
            venue: "Room 101".to_string(),
        }
    }

    #[test]
    fn minute_offsets_anchor_at_nine() {
        assert_eq!(minute_offset(time(9, 0)), 0.0);
        assert_eq!(minute_offset(time(10, 30)), 90.0);
        assert_eq!(minute_offset(time(18, 0)), 540.0);
        // Out-of-window values are not clamped.
        assert_eq!(minute_offset(time(8, 30)), -30.0);
        assert_eq!(minute_offset(time(19, 15)), 615.0);
    }

    #[test]
    fn single_session_lays_out_one_bar() {
        let sessions = vec![session("COMP3251", "A", Weekday::Mon, time(9, 0), time(10, 30))];
        let colors = ColorMap::from_sessions(&sessions);

        let bars = layout(&sessions, &colors);
        assert_eq!(bars.len(), 1);

        let bar = &bars[0];
        assert_eq!(bar.day, 1.0);
        assert_eq!(bar.start_min, 0.0);
        assert_eq!(bar.end_min, 90.0);
        assert_eq!(bar.palette_slot, 0);
        assert_eq!(bar.label[0], "COMP3251 A");
        assert_eq!(bar.label[1], "Room 101");
        assert_eq!(bar.label[2], "09:00 - 10:30");
    }

    #[test]
    fn groups_share_a_palette_slot() {
        let sessions = vec![
            session("COMP3251", "A", Weekday::Mon, time(9, 0), time(10, 0)),
            session("STAT4609", "A", Weekday::Tue, time(9, 0), time(10, 0)),
            session("COMP3251", "A", Weekday::Thu, time(9, 0), time(10, 0)),
        ];
        let colors = ColorMap::from_sessions(&sessions);

        let bars = layout(&sessions, &colors);
        assert_eq!(bars[0].palette_slot, 0);
        assert_eq!(bars[1].palette_slot, 1);
        assert_eq!(bars[2].palette_slot, 0);
    }

    #[test]
    fn weekend_sessions_lay_out_off_axis() {
        let sessions = vec![session("COMP3251", "A", Weekday::Sat, time(9, 0), time(10, 0))];
        let colors = ColorMap::from_sessions(&sessions);

        // Laid out at x = 6, past the fixed [0.5, 5.5] range; clipped, not dropped.
        assert_eq!(layout(&sessions, &colors)[0].day, 6.0);
    }

    #[test]
    fn axis_tick_labels() {
        assert_eq!(weekday_tick(&1.0), "Monday");
        assert_eq!(weekday_tick(&5.0), "Friday");
        assert_eq!(weekday_tick(&0.0), "");
        assert_eq!(hour_tick(&0.0), "9:00");
        assert_eq!(hour_tick(&540.0), "18:00");
    }

    #[test]
    fn render_png_smoke() {
        let sessions = vec![
            session("COMP3251", "A", Weekday::Mon, time(9, 0), time(10, 30)),
            session("STAT4609", "B", Weekday::Wed, time(14, 0), time(15, 20)),
        ];
        let colors = ColorMap::from_sessions(&sessions);

        // Text layout needs a system font; only assert when one is available.
        if let Ok(png) = render_png(&sessions, &colors) {
            assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        }
    }
}
