//! Display formatting shared by the browser app and the CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const PLACEHOLDER: &str = "—";

pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped decimal with at most `max_fraction` digits and no trailing zeros,
/// e.g. `1234.5` → `1,234.5`.
pub fn number(value: f64, max_fraction: usize) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (fixed, String::new()),
    };
    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{}", group_thousands(&int_part))
    } else {
        format!("{sign}{}.{frac_part}", group_thousands(&int_part))
    }
}

pub fn usd_whole(value: f64) -> String {
    let grouped = number(value.abs(), 0);
    if value < 0.0 && grouped != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn signed_usd_whole(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", usd_whole(value))
    } else {
        usd_whole(value)
    }
}

pub fn usd(value: f64) -> String {
    format!("${}", number(value, 3))
}

pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `2024-03-05` or an RFC 3339 timestamp → `3/5/2024`. Anything unparseable is
/// shown as given.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// RFC 3339 timestamp → `3/5/2024, 2:07:09 PM` (UTC).
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.naive_utc().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
    }
    display_date(raw)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
