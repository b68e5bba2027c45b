use std::path::Path;
use std::sync::OnceLock;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use super::model::{parse_time, RawRecord, RawTable, Weekday};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load the source timetable. Fatal to the session: the cache
/// keeps the error and hands it back on every later access, no retry.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("malformed {format} timetable: {reason}")]
    Malformed { format: &'static str, reason: String },
}

impl LoadError {
    fn io(path: &Path, err: impl std::fmt::Display) -> LoadError {
        LoadError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fixed path of the source timetable.
pub const TIMETABLE_PATH: &str = "2024-25_class_timetable_20240830.xlsx";

static TIMETABLE: OnceLock<Result<RawTable, LoadError>> = OnceLock::new();

/// The process-wide timetable, loaded from [`TIMETABLE_PATH`] on first
/// access and reused for the rest of the process lifetime. The source file
/// is treated as immutable, so there is no invalidation.
pub fn cached_timetable() -> Result<&'static RawTable, LoadError> {
    TIMETABLE
        .get_or_init(|| load_file(Path::new(TIMETABLE_PATH)))
        .as_ref()
        .map_err(Clone::clone)
}

/// Load a timetable from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – spreadsheet as published by the university (first sheet)
/// * `.csv`  – same columns, one header row
/// * `.json` – records-oriented array of row objects
pub fn load_file(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" => load_xlsx(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!("loaded {} timetable rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Column indices of the required headers, matched after whitespace
/// trimming. Extra columns are ignored; order is irrelevant.
struct Columns {
    term: usize,
    course_code: usize,
    course_title: usize,
    class_section: usize,
    weekdays: [usize; 7],
    start_time: usize,
    end_time: usize,
    venue: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Columns, LoadError> {
        let find = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        let mut weekdays = [0usize; 7];
        for (slot, header) in weekdays.iter_mut().zip(Weekday::MARKER_HEADERS) {
            *slot = find(header)?;
        }

        Ok(Columns {
            term: find("TERM")?,
            course_code: find("COURSE CODE")?,
            course_title: find("COURSE TITLE")?,
            class_section: find("CLASS SECTION")?,
            weekdays,
            start_time: find("START TIME")?,
            end_time: find("END TIME")?,
            venue: find("VENUE")?,
        })
    }
}

/// Best-effort text-to-time conversion with a 00:00 fallback. Rows are
/// never rejected for bad time cells.
fn text_time(text: &str, what: &str) -> NaiveTime {
    match parse_time(text) {
        Some(t) => t,
        None => {
            log::warn!("unparseable {what} cell {text:?}, using 00:00");
            NaiveTime::MIN
        }
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an xlsx workbook. The header row is matched
/// against the required column names after trimming.
fn load_xlsx(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| LoadError::io(path, e))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::Malformed {
            format: "xlsx",
            reason: "workbook has no sheets".to_string(),
        })?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Malformed {
            format: "xlsx",
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::Malformed {
            format: "xlsx",
            reason: "sheet has no header row".to_string(),
        })?
        .iter()
        .map(cell_text)
        .collect();
    let cols = Columns::resolve(&headers)?;

    let records = rows.map(|row| record_from_cells(row, &cols)).collect();
    Ok(RawTable { records })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Read a time-of-day cell: a real Excel time value when the sheet stores
/// one, otherwise best-effort text parsing.
fn cell_time(cell: &Data, what: &str) -> NaiveTime {
    if let Some(t) = cell.as_time() {
        return t;
    }
    if let Some(dt) = cell.as_datetime() {
        return dt.time();
    }
    text_time(&cell_text(cell), what)
}

fn record_from_cells(row: &[Data], cols: &Columns) -> RawRecord {
    let text = |index: usize| row.get(index).map(cell_text).unwrap_or_default();
    let time = |index: usize, what: &str| {
        row.get(index)
            .map(|cell| cell_time(cell, what))
            .unwrap_or(NaiveTime::MIN)
    };

    let mut weekday_markers: [String; 7] = Default::default();
    for (slot, &index) in weekday_markers.iter_mut().zip(&cols.weekdays) {
        *slot = text(index);
    }

    RawRecord {
        term_label: text(cols.term),
        course_code: text(cols.course_code),
        course_title: text(cols.course_title),
        class_section: text(cols.class_section),
        weekday_markers,
        start_time: time(cols.start_time, "START TIME"),
        end_time: time(cols.end_time, "END TIME"),
        venue: text(cols.venue),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    read_csv(file)
}

/// Parse CSV from any reader (split out so tests can feed byte slices).
fn read_csv<R: std::io::Read>(input: R) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Malformed {
            format: "csv",
            reason: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cols = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Malformed {
            format: "csv",
            reason: format!("row {row_no}: {e}"),
        })?;
        let text = |index: usize| row.get(index).unwrap_or("").trim().to_string();

        let mut weekday_markers: [String; 7] = Default::default();
        for (slot, &index) in weekday_markers.iter_mut().zip(&cols.weekdays) {
            *slot = text(index);
        }

        records.push(RawRecord {
            term_label: text(cols.term),
            course_code: text(cols.course_code),
            course_title: text(cols.course_title),
            class_section: text(cols.class_section),
            weekday_markers,
            start_time: text_time(&text(cols.start_time), "START TIME"),
            end_time: text_time(&text(cols.end_time), "END TIME"),
            venue: text(cols.venue),
        });
    }
    Ok(RawTable { records })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: `[{"TERM": …, "COURSE CODE": …, …}, …]`. Absent
/// and `null` cells are treated as empty.
#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(rename = "TERM", default)]
    term: Option<String>,
    #[serde(rename = "COURSE CODE", default)]
    course_code: Option<String>,
    #[serde(rename = "COURSE TITLE", default)]
    course_title: Option<String>,
    #[serde(rename = "CLASS SECTION", default)]
    class_section: Option<String>,
    #[serde(rename = "MON", default)]
    mon: Option<String>,
    #[serde(rename = "TUE", default)]
    tue: Option<String>,
    #[serde(rename = "WED", default)]
    wed: Option<String>,
    #[serde(rename = "THU", default)]
    thu: Option<String>,
    #[serde(rename = "FRI", default)]
    fri: Option<String>,
    #[serde(rename = "SAT", default)]
    sat: Option<String>,
    #[serde(rename = "SUN", default)]
    sun: Option<String>,
    #[serde(rename = "START TIME", default)]
    start_time: Option<String>,
    #[serde(rename = "END TIME", default)]
    end_time: Option<String>,
    #[serde(rename = "VENUE", default)]
    venue: Option<String>,
}

impl JsonRow {
    fn into_record(self) -> RawRecord {
        let text = |value: Option<String>| value.unwrap_or_default().trim().to_string();
        let weekday_markers = [
            text(self.mon),
            text(self.tue),
            text(self.wed),
            text(self.thu),
            text(self.fri),
            text(self.sat),
            text(self.sun),
        ];
        RawRecord {
            term_label: text(self.term),
            course_code: text(self.course_code),
            course_title: text(self.course_title),
            class_section: text(self.class_section),
            weekday_markers,
            start_time: text_time(&text(self.start_time), "START TIME"),
            end_time: text_time(&text(self.end_time), "END TIME"),
            venue: text(self.venue),
        }
    }
}

fn load_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<RawTable, LoadError> {
    let rows: Vec<JsonRow> = serde_json::from_str(text).map_err(|e| LoadError::Malformed {
        format: "json",
        reason: e.to_string(),
    })?;
    let records = rows.into_iter().map(JsonRow::into_record).collect();
    Ok(RawTable { records })
}
