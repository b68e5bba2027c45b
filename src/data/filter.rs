use std::collections::{BTreeSet, HashSet};

use super::model::{RawRecord, RawTable, Session, Term, Weekday};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// What the user asked for: which courses, which term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableQuery {
    /// Course codes matched exactly (case-sensitive) after trimming.
    pub course_codes: BTreeSet<String>,
    pub term: Term,
}

/// Split the comma-separated user input into a set of trimmed codes.
pub fn parse_course_codes(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// First non-empty weekday marker in Mon..Sun order, or `None` when the row
/// has no marker at all. When several markers are set the first wins; the
/// ambiguity is logged but the row is kept.
pub fn derive_weekday(record: &RawRecord) -> Option<Weekday> {
    let mut markers = record
        .weekday_markers
        .iter()
        .enumerate()
        .filter(|(_, marker)| !marker.trim().is_empty());

    let (index, _) = markers.next()?;
    let weekday = Weekday::from_index(index)?;
    if markers.next().is_some() {
        log::warn!(
            "{} {} has multiple weekday markers, keeping {weekday}",
            record.course_code,
            record.class_section
        );
    }
    Some(weekday)
}

/// Normalize the raw table: derive weekday and term, project to the session
/// fields, drop rows without a weekday marker, and collapse exact duplicates
/// (first occurrence wins).
pub fn derive_sessions(table: &RawTable) -> Vec<Session> {
    let mut seen = HashSet::new();
    let mut sessions = Vec::new();

    for record in &table.records {
        let Some(weekday) = derive_weekday(record) else {
            continue;
        };
        let session = Session {
            term: Term::from_label(&record.term_label),
            course_code: record.course_code.clone(),
            course_title: record.course_title.clone(),
            class_section: record.class_section.clone(),
            weekday,
            start_time: record.start_time,
            end_time: record.end_time,
            venue: record.venue.clone(),
        };
        if seen.insert(session.clone()) {
            sessions.push(session);
        }
    }
    sessions
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Filter and order an already-derived session list. Idempotent: running it
/// twice with the same query yields the same sequence.
pub fn apply_query(mut sessions: Vec<Session>, query: &TimetableQuery) -> Vec<Session> {
    sessions.retain(|session| {
        query.course_codes.contains(session.course_code.trim()) && session.term == query.term
    });
    // Stable sort, so ties keep their source order.
    sessions.sort_by_key(|session| (session.term, session.weekday, session.start_time));
    sessions
}

/// Run a query against the raw table: derive, filter, and order the
/// matching sessions by (term, weekday, start time). An empty result is a
/// normal outcome, not an error.
pub fn filter_timetable(table: &RawTable, query: &TimetableQuery) -> Vec<Session> {
    apply_query(derive_sessions(table), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn record(
        term: &str,
        code: &str,
        section: &str,
        marker_days: &[usize],
        start: NaiveTime,
        end: NaiveTime,
        venue: &str,
    ) -> RawRecord {
        let mut weekday_markers: [String; 7] = Default::default();
        for &day in marker_days {
            weekday_markers[day] = "X".to_string();
        }
        RawRecord {
            term_label: term.to_string(),
            course_code: code.to_string(),
            course_title: format!("{code} title"),
            class_section: section.to_string(),
            weekday_markers,
            start_time: start,
            end_time: end,
            venue: venue.to_string(),
        }
    }

    fn query(codes: &[&str], term: Term) -> TimetableQuery {
        TimetableQuery {
            course_codes: codes.iter().map(|c| c.to_string()).collect(),
            term,
        }
    }

    #[test]
    fn single_marker_maps_to_its_position() {
        for (index, weekday) in Weekday::ALL.into_iter().enumerate() {
            let rec = record("Sem 1", "C", "A", &[index], time(9, 0), time(10, 0), "V");
            assert_eq!(derive_weekday(&rec), Some(weekday));
            assert_eq!(weekday.number() as usize, index + 1);
        }
    }

    #[test]
    fn no_marker_yields_none_and_drops_the_row() {
        let rec = record("Sem 1", "C", "A", &[], time(9, 0), time(10, 0), "V");
        assert_eq!(derive_weekday(&rec), None);

        let table = RawTable { records: vec![rec] };
        assert!(derive_sessions(&table).is_empty());
    }

    #[test]
    fn first_of_multiple_markers_wins() {
        let rec = record("Sem 1", "C", "A", &[1, 4], time(9, 0), time(10, 0), "V");
        assert_eq!(derive_weekday(&rec), Some(Weekday::Tue));
    }

    #[test]
    fn exact_duplicate_rows_collapse() {
        let rec = record(
            "2024-25 Sem 1",
            "COMP3251",
            "A",
            &[0],
            time(9, 0),
            time(10, 30),
            "Room 101",
        );
        let table = RawTable {
            records: vec![rec.clone(), rec],
        };
        assert_eq!(derive_sessions(&table).len(), 1);
    }

    #[test]
    fn near_duplicate_rows_stay_distinct() {
        let a = record("Sem 1", "COMP3251", "A", &[0], time(9, 0), time(10, 30), "Room 101");
        let b = record("Sem 1", "COMP3251", "A", &[0], time(9, 0), time(10, 30), "Room 102");
        let table = RawTable { records: vec![a, b] };
        assert_eq!(derive_sessions(&table).len(), 2);
    }

    #[test]
    fn parse_course_codes_trims_and_drops_empties() {
        let codes = parse_course_codes(" COMP3251 , STAT4609 ,, ");
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("COMP3251"));
        assert!(codes.contains("STAT4609"));
    }

    #[test]
    fn matching_is_case_sensitive_after_trimming() {
        let table = RawTable {
            records: vec![record(
                "Sem 1",
                "COMP3251 ",
                "A",
                &[0],
                time(9, 0),
                time(10, 0),
                "V",
            )],
        };
        assert_eq!(
            filter_timetable(&table, &query(&["COMP3251"], Term::Sem1)).len(),
            1
        );
        assert!(filter_timetable(&table, &query(&["comp3251"], Term::Sem1)).is_empty());
    }

    #[test]
    fn sessions_sort_by_term_weekday_start() {
        let table = RawTable {
            records: vec![
                record("Sem 2", "C1", "A", &[0], time(10, 0), time(11, 0), "V"),
                record("Sem 2", "C1", "B", &[0], time(9, 0), time(10, 0), "V"),
                record("Sem 1", "C1", "A", &[2], time(10, 0), time(11, 0), "V"),
                record("Sem 2", "C1", "C", &[4], time(8, 0), time(9, 0), "V"),
            ],
        };
        let all: BTreeSet<String> = ["C1".to_string()].into_iter().collect();

        let sem2 = apply_query(
            derive_sessions(&table),
            &TimetableQuery {
                course_codes: all,
                term: Term::Sem2,
            },
        );
        let order: Vec<(Weekday, NaiveTime)> =
            sem2.iter().map(|s| (s.weekday, s.start_time)).collect();
        assert_eq!(
            order,
            vec![
                (Weekday::Mon, time(9, 0)),
                (Weekday::Mon, time(10, 0)),
                (Weekday::Fri, time(8, 0)),
            ]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let table = RawTable {
            records: vec![
                record("Sem 2", "C1", "A", &[0], time(10, 0), time(11, 0), "V"),
                record("Sem 2", "C2", "A", &[1], time(9, 0), time(10, 0), "V"),
                record("Sem 1", "C1", "A", &[2], time(10, 0), time(11, 0), "V"),
            ],
        };
        let q = query(&["C1", "C2"], Term::Sem2);

        let once = filter_timetable(&table, &q);
        let twice = apply_query(once.clone(), &q);
        assert_eq!(once, twice);
    }

    #[test]
    fn end_to_end_single_row_scenario() {
        let table = RawTable {
            records: vec![record(
                "2024-25 Sem 1",
                "COMP3251",
                "A",
                &[0],
                time(9, 0),
                time(10, 30),
                "Room 101",
            )],
        };

        let hit = filter_timetable(&table, &query(&["COMP3251"], Term::Sem1));
        assert_eq!(hit.len(), 1);
        let session = &hit[0];
        assert_eq!(session.term, Term::Sem1);
        assert_eq!(session.weekday, Weekday::Mon);
        assert_eq!(session.start_time, time(9, 0));
        assert_eq!(session.end_time, time(10, 30));
        assert_eq!(session.venue, "Room 101");

        let miss = filter_timetable(&table, &query(&["COMP3251"], Term::Sem2));
        assert!(miss.is_empty());
    }
}
