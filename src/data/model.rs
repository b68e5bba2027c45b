use std::fmt;

use chrono::NaiveTime;

// ---------------------------------------------------------------------------
// Term – academic period
// ---------------------------------------------------------------------------

/// Academic term of a class session.
///
/// `Other` doubles as the fallback for labels without a recognizable
/// semester indicator, so it means "other/unclassified" rather than a
/// guaranteed third term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Sem1,
    Sem2,
    Other,
}

impl Term {
    /// Terms in the order the UI presents them (no semantic meaning).
    pub const UI_ORDER: [Term; 3] = [Term::Sem2, Term::Sem1, Term::Other];

    /// Parse a free-text term label. A "Sem 1" or "Sem 2" substring wins;
    /// anything else (summer terms, malformed labels) falls back to
    /// [`Term::Other`].
    pub fn from_label(label: &str) -> Term {
        if label.contains("Sem 1") {
            Term::Sem1
        } else if label.contains("Sem 2") {
            Term::Sem2
        } else {
            Term::Other
        }
    }

    /// Numeric encoding 1..=3. Matches the variant sort order.
    pub fn number(self) -> u8 {
        match self {
            Term::Sem1 => 1,
            Term::Sem2 => 2,
            Term::Other => 3,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Sem1 => write!(f, "Semester 1"),
            Term::Sem2 => write!(f, "Semester 2"),
            Term::Other => write!(f, "Other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of the week a session occurs on, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Column headers of the marker fields, in scan order.
    pub const MARKER_HEADERS: [&'static str; 7] =
        ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

    /// Day at the given 0-based marker position.
    pub fn from_index(index: usize) -> Option<Weekday> {
        Weekday::ALL.get(index).copied()
    }

    /// 1-based position, Monday = 1.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// RawRecord / RawTable – the source table as loaded
// ---------------------------------------------------------------------------

/// One row of the source timetable, before weekday/term derivation.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub term_label: String,
    pub course_code: String,
    pub course_title: String,
    pub class_section: String,
    /// Marker cells in MON..SUN order; an empty string means "not set".
    pub weekday_markers: [String; 7],
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
}

/// The complete loaded timetable.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Session – the derived, presentation-ready record
// ---------------------------------------------------------------------------

/// A normalized class session. Equality is structural so exact-duplicate
/// source rows collapse to one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub term: Term,
    pub course_code: String,
    pub course_title: String,
    pub class_section: String,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
}

// ---------------------------------------------------------------------------
// Time parsing
// ---------------------------------------------------------------------------

/// Best-effort parse of a time-of-day cell rendered as text.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    for format in ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M%p"] {
        if let Ok(t) = NaiveTime::parse_from_str(text, format) {
            return Some(t);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_from_label() {
        assert_eq!(Term::from_label("2024-25 Sem 1"), Term::Sem1);
        assert_eq!(Term::from_label("2024-25 Sem 2"), Term::Sem2);
        assert_eq!(Term::from_label("Summer Term"), Term::Other);
        assert_eq!(Term::from_label(""), Term::Other);
    }

    #[test]
    fn term_numbers_follow_sort_order() {
        assert!(Term::Sem1 < Term::Sem2);
        assert!(Term::Sem2 < Term::Other);
        assert_eq!(
            [1, 2, 3],
            [Term::Sem1.number(), Term::Sem2.number(), Term::Other.number()]
        );
    }

    #[test]
    fn weekday_numbers_are_one_based() {
        assert_eq!(Weekday::from_index(0), Some(Weekday::Mon));
        assert_eq!(Weekday::from_index(6), Some(Weekday::Sun));
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::Mon.number(), 1);
        assert_eq!(Weekday::Fri.number(), 5);
        assert_eq!(Weekday::Sun.number(), 7);
    }

    #[test]
    fn parse_time_accepts_common_formats() {
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time(" 14:30:15 "), NaiveTime::from_hms_opt(14, 30, 15));
        assert_eq!(parse_time("2:30 PM"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time("noon"), None);
        assert_eq!(parse_time(""), None);
    }
}
