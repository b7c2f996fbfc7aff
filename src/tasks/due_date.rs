//! Due-date parsing and display.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex"));

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_due(value: &str) -> Option<NaiveDate> {
    if !DATE_FORMAT.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueLabel {
    pub text: String,
    pub overdue: bool,
}

/// Human label for a due date relative to `today`
///
/// Empty for no date, `Invalid Date` for anything that does not parse,
/// otherwise `Today`, `Tomorrow`, `Overdue` or a short `Mon D` date.
pub fn describe_due(due: Option<&str>, today: NaiveDate) -> DueLabel {
    let Some(raw) = due.filter(|d| !d.is_empty()) else {
        return DueLabel {
            text: String::new(),
            overdue: false,
        };
    };

    let Some(date) = parse_due(raw) else {
        return DueLabel {
            text: "Invalid Date".to_string(),
            overdue: false,
        };
    };

    let days = (date - today).num_days();
    let overdue = days < 0;
    let text = match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d if d < 0 => "Overdue".to_string(),
        _ => date.format("%b %-d").to_string(),
    };

    DueLabel { text, overdue }
}
