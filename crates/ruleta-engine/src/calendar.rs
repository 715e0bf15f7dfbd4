//! Schedule date helpers.

use chrono::{Datelike, Duration, NaiveDate};

/// Format used for dates stored in the history.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Days between two consecutive assignments.
pub const DAYS_BETWEEN_DRAWS: i64 = 7;

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Spanish name of a 1-based month number.
pub fn spanish_month(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| SPANISH_MONTHS.get(i as usize))
        .copied()
}

/// "Semana N" where days 1-7 are week 1, 8-14 week 2, and so on.
pub fn week_label(day_of_month: u32) -> String {
    format!("Semana {}", day_of_month.saturating_sub(1) / 7 + 1)
}

/// Last year that still fits the four-digit `YYYY` field.
const MAX_YEAR: i32 = 9999;

/// Parse a stored `DD/MM/YYYY` date. The year must be exactly four digits.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let year = s.rsplit('/').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// The date the next assignment lands on.
///
/// One week after `last` when it parses and the result is still a
/// four-digit year, otherwise `today`.
pub fn next_assignment_date(last: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = last else {
        return today;
    };
    parse_date(raw)
        .and_then(|anchor| anchor.checked_add_signed(Duration::days(DAYS_BETWEEN_DRAWS)))
        .filter(|next| next.year() <= MAX_YEAR)
        .unwrap_or_else(|| {
            tracing::warn!("⚠️ Unusable history date {raw:?}, scheduling from today");
            today
        })
}

/// Display fields derived from an assignment date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub date: String,
    pub month: String,
    pub week: String,
}

impl ScheduleSlot {
    pub fn for_date(date: NaiveDate) -> Self {
        let month = spanish_month(date.month())
            .map(str::to_string)
            .unwrap_or_else(|| date.format("%B").to_string());
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            month,
            week: week_label(date.day()),
        }
    }
}
