//! Winning-numbers collaborator interface. The pipeline itself never reads
//! draw history; callers populate a [`DrawTable`] from their own source and
//! join it against extracted plays.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use time::{macros::format_description, Date, Month};

// Draw
//------------------------------------------------------------------------------

/// The numbers drawn on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub white: [u8; 5],
    pub powerball: u8,
}

/// Read-only date-keyed lookup of historical draws.
#[derive(Debug, Clone, Default)]
pub struct DrawTable {
    draws: HashMap<Date, Draw>,
}

impl DrawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: Date, draw: Draw) {
        self.draws.insert(date, draw);
    }

    pub fn get(&self, date: Date) -> Option<&Draw> {
        self.draws.get(&date)
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl FromIterator<(Date, Draw)> for DrawTable {
    fn from_iter<I: IntoIterator<Item = (Date, Draw)>>(iter: I) -> Self {
        Self { draws: iter.into_iter().collect() }
    }
}

/// Parses the table's ISO "YYYY-MM-DD" key format.
pub fn parse_iso_date(s: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s, format).ok()
}

// Drawing date
//------------------------------------------------------------------------------

// Ticket headers print the draw date as e.g. "SAT JUL20 24"; OCR may drop
// the space after the month.
static HEADER_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s?([0-9]{1,2})\s+([0-9]{2})\b")
        .unwrap()
});

/// Flat regex match for the drawing date in recognized header text.
pub fn drawing_date(text: &str) -> Option<Date> {
    let caps = HEADER_DATE.captures(text)?;
    let month = month_from_abbrev(&caps[1])?;
    let day: u8 = caps[2].parse().ok()?;
    let year: i32 = 2000 + caps[3].parse::<i32>().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn month_from_abbrev(abbrev: &str) -> Option<Month> {
    Some(match abbrev {
        "JAN" => Month::January,
        "FEB" => Month::February,
        "MAR" => Month::March,
        "APR" => Month::April,
        "MAY" => Month::May,
        "JUN" => Month::June,
        "JUL" => Month::July,
        "AUG" => Month::August,
        "SEP" => Month::September,
        "OCT" => Month::October,
        "NOV" => Month::November,
        "DEC" => Month::December,
        _ => return None,
    })
}
