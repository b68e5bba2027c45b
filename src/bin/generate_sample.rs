use rust_xlsxwriter::{Workbook, XlsxError};

/// Where the app expects the source timetable.
const OUTPUT_PATH: &str = "2024-25_class_timetable_20240830.xlsx";

/// Header row, in sheet order.
const HEADERS: [&str; 14] = [
    "TERM",
    "COURSE CODE",
    "COURSE TITLE",
    "CLASS SECTION",
    "MON",
    "TUE",
    "WED",
    "THU",
    "FRI",
    "SAT",
    "SUN",
    "START TIME",
    "END TIME",
    "VENUE",
];

/// One scheduled meeting: weekday column index (0 = MON), start, end, venue.
type Meeting = (usize, &'static str, &'static str, &'static str);

struct Offering {
    term: &'static str,
    code: &'static str,
    title: &'static str,
    section: &'static str,
    meetings: &'static [Meeting],
}

const OFFERINGS: &[Offering] = &[
    Offering {
        term: "2024-25 Sem 2",
        code: "COMP3251",
        title: "Algorithm design and analysis",
        section: "A",
        meetings: &[
            (0, "09:30", "10:20", "MWT1"),
            (3, "09:30", "11:20", "MWT1"),
        ],
    },
    Offering {
        term: "2024-25 Sem 2",
        code: "STAT4609",
        title: "Big data analytics",
        section: "A",
        meetings: &[
            (1, "13:30", "15:20", "KK201"),
            (4, "13:30", "14:20", "KK201"),
        ],
    },
    Offering {
        term: "2024-25 Sem 2",
        code: "STAT3655",
        title: "Statistical machine learning",
        section: "B",
        meetings: &[(2, "10:30", "12:20", "CPD-2.16")],
    },
    Offering {
        term: "2024-25 Sem 1",
        code: "COMP3278",
        title: "Introduction to database management systems",
        section: "A",
        meetings: &[
            (0, "13:30", "14:20", "CB-A"),
            (2, "13:30", "15:20", "CB-A"),
        ],
    },
    Offering {
        term: "2024-25 Summer Term",
        code: "CCST9003",
        title: "Everyday computing and the internet",
        section: "A",
        meetings: &[(1, "10:30", "12:20", "KB223")],
    },
    // Weekend section: plots outside the Monday..Friday axis.
    Offering {
        term: "2024-25 Sem 2",
        code: "MBA7002",
        title: "Leadership development",
        section: "S1",
        meetings: &[(5, "09:30", "17:20", "Admiralty Centre")],
    },
];

fn main() -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    let mut row: u32 = 1;
    let mut write_meeting = |row: u32,
                             offering: &Offering,
                             meeting: &Meeting|
     -> Result<(), XlsxError> {
        let (day, start, end, venue) = *meeting;
        worksheet.write_string(row, 0, offering.term)?;
        worksheet.write_string(row, 1, offering.code)?;
        worksheet.write_string(row, 2, offering.title)?;
        worksheet.write_string(row, 3, offering.section)?;
        worksheet.write_string(row, 4 + day as u16, "X")?;
        worksheet.write_string(row, 11, start)?;
        worksheet.write_string(row, 12, end)?;
        worksheet.write_string(row, 13, venue)?;
        Ok(())
    };

    for offering in OFFERINGS {
        for meeting in offering.meetings {
            write_meeting(row, offering, meeting)?;
            row += 1;
        }
    }

    // The published timetable contains duplicated rows; repeat one meeting
    // so the dedup step has something to collapse.
    if let Some(first) = OFFERINGS.first() {
        if let Some(meeting) = first.meetings.first() {
            write_meeting(row, first, meeting)?;
            row += 1;
        }
    }

    workbook.save(OUTPUT_PATH)?;
    println!("Wrote {} timetable rows to {OUTPUT_PATH}", row - 1);
    Ok(())
}
