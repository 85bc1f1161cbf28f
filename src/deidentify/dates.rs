//! Locale-aware date shifting
//!
//! Shifts a date string by a number of days while re-serializing it in the
//! same visual format as the input: separator, field order, and month-name
//! style are preserved. Field order for ambiguous numeric dates follows the
//! language convention (day-first for the European locales, month-first for
//! English). Anything unparseable degrades to a placeholder instead of
//! failing the whole de-identification call.

use crate::domain::Language;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Placeholder emitted when a date cannot be parsed or re-serialized.
pub const DATE_SHIFT_PLACEHOLDER: &str = "[DATE_SHIFTED]";

static NUMERIC_SLASH_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([/\-])(\d{1,2})[/\-](\d{2,4})$").unwrap()
});
static ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})$").unwrap());
static DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{2,4})$").unwrap());
static DAY_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(\.?)\s+([A-Za-zÀ-ÿ]+)\s+(\d{4})$").unwrap()
});
static MONTH_NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-zÀ-ÿ]+)\s+(\d{1,2}),?\s+(\d{4})$").unwrap()
});
static SPANISH_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+de\s+([A-Za-zà-ÿ]+)\s+de\s+(\d{4})$").unwrap()
});

/// The serialization shape recovered from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DateStyle {
    /// MM/DD/YYYY or MM-DD-YYYY
    NumericMdy(char),
    /// DD/MM/YYYY or DD-MM-YYYY
    NumericDmy(char),
    /// DD.MM.YYYY
    Dotted,
    /// YYYY-MM-DD
    Iso,
    /// "15 janvier 2020", optionally "15. Januar 2020"
    DayMonthName { dotted_day: bool },
    /// "January 15, 2020"
    MonthNameDay,
    /// "15 de enero de 2020"
    SpanishLong,
}

/// Shift `date_str` by `shift_days`, preserving the input format.
///
/// When `keep_year` is set the original year is restored after the shift, so
/// month and day still roll across month boundaries but the year component
/// never changes. Failures yield [`DATE_SHIFT_PLACEHOLDER`].
pub fn shift_date(date_str: &str, shift_days: i64, keep_year: bool, language: Language) -> String {
    let trimmed = date_str.trim();
    let parsed = parse_date(trimmed, language);
    let (date, style) = match parsed {
        Some(v) => v,
        None => {
            warn!(input = %trimmed, "unparseable date, masking");
            return DATE_SHIFT_PLACEHOLDER.to_string();
        }
    };

    let original_year = date.year();
    let shifted = date + Duration::days(shift_days);
    let shifted = if keep_year {
        match shifted.with_year(original_year) {
            Some(d) => d,
            None => {
                // Feb 29 landing in a non-leap original year.
                warn!(input = %trimmed, "year restoration produced invalid date, masking");
                return DATE_SHIFT_PLACEHOLDER.to_string();
            }
        }
    } else {
        shifted
    };

    format_date(shifted, &style, language)
}

fn parse_date(input: &str, language: Language) -> Option<(NaiveDate, DateStyle)> {
    if let Some(caps) = ISO.captures(input) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, DateStyle::Iso));
    }

    if let Some(caps) = DOTTED.captures(input) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, DateStyle::Dotted));
    }

    if let Some(caps) = NUMERIC_SLASH_DASH.captures(input) {
        let first: u32 = caps[1].parse().ok()?;
        let sep = caps[2].chars().next()?;
        let second: u32 = caps[3].parse().ok()?;
        let year = expand_year(caps[4].parse().ok()?);
        let day_first = language.day_first();
        let (day, month, style) = if day_first {
            (first, second, DateStyle::NumericDmy(sep))
        } else {
            (second, first, DateStyle::NumericMdy(sep))
        };
        // Fall back to the other field order when the preferred one is
        // impossible (e.g. "25/12" in English text).
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| (d, style))
            .or_else(|| {
                let (style, month, day) = if day_first {
                    (DateStyle::NumericMdy(sep), first, second)
                } else {
                    (DateStyle::NumericDmy(sep), second, first)
                };
                NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, style))
            });
    }

    if let Some(caps) = SPANISH_LONG.captures(input) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2], language)?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, DateStyle::SpanishLong));
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(input) {
        let day: u32 = caps[1].parse().ok()?;
        let dotted_day = !caps[2].is_empty();
        let month = month_from_name(&caps[3], language)?;
        let year: i32 = caps[4].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| (d, DateStyle::DayMonthName { dotted_day }));
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(input) {
        let month = month_from_name(&caps[1], language)?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, DateStyle::MonthNameDay));
    }

    None
}

/// Two-digit years: 00-49 are 2000s, 50-99 are 1900s.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        if year < 50 {
            year + 2000
        } else {
            year + 1900
        }
    } else {
        year
    }
}

/// Resolve a month name against the language's table first, then every
/// other supported language (clinical text mixes conventions).
fn month_from_name(name: &str, language: Language) -> Option<u32> {
    let lowered = name.to_lowercase();
    let position = |months: &[&str; 12]| {
        months
            .iter()
            .position(|m| m.to_lowercase() == lowered)
            .map(|i| i as u32 + 1)
    };
    position(language.month_names()).or_else(|| {
        crate::domain::SUPPORTED_LANGUAGES
            .iter()
            .filter(|l| **l != language)
            .find_map(|l| position(l.month_names()))
    })
}

fn format_date(date: NaiveDate, style: &DateStyle, language: Language) -> String {
    match style {
        DateStyle::Iso => format!("{}-{:02}-{:02}", date.year(), date.month(), date.day()),
        DateStyle::Dotted => format!("{:02}.{:02}.{}", date.day(), date.month(), date.year()),
        DateStyle::NumericMdy(sep) => {
            format!("{:02}{sep}{:02}{sep}{}", date.month(), date.day(), date.year())
        }
        DateStyle::NumericDmy(sep) => {
            format!("{:02}{sep}{:02}{sep}{}", date.day(), date.month(), date.year())
        }
        DateStyle::SpanishLong => {
            let month = language.month_names()[date.month0() as usize];
            format!("{} de {} de {}", date.day(), month, date.year())
        }
        DateStyle::DayMonthName { dotted_day } => {
            let month = language.month_names()[date.month0() as usize];
            let dot = if *dotted_day { "." } else { "" };
            format!("{}{dot} {} {}", date.day(), month, date.year())
        }
        DateStyle::MonthNameDay => {
            let month = language.month_names()[date.month0() as usize];
            format!("{} {}, {}", month, date.day(), date.year())
        }
    }
}
