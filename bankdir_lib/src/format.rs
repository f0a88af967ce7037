//! Display formatting for directory values.

use bankdir_query::types::Financials;
use std::collections::BTreeMap;

pub const PLACEHOLDER: &str = "—";

/// Group digits in threes: `1234567` -> `"1,234,567"`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// An amount stored in thousands, shown as-is: `Some(1234)` -> `"$1,234"`.
pub fn format_currency_thousands(amount: Option<i64>) -> String {
    match amount {
        Some(v) => format!("${}", group_thousands(v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// An amount stored in thousands, shown in full dollars.
pub fn format_currency(amount: Option<i64>) -> String {
    match amount {
        Some(v) => format!("${}", group_thousands(v.saturating_mul(1000))),
        None => PLACEHOLDER.to_string(),
    }
}

/// `(785) 555-1234` for ten-digit numbers; anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
    } else {
        phone.to_string()
    }
}

pub fn display_value(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Link target for a stored website, adding `https://` when no scheme is present.
pub fn website_url(website: &str) -> String {
    let trimmed = website.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Each monetary field formatted in thousands; zero and unreported values are `None`.
pub fn format_figures(financials: &Financials) -> BTreeMap<&'static str, Option<String>> {
    financials
        .entries()
        .into_iter()
        .map(|(field, value)| {
            let formatted = value
                .filter(|v| *v != 0)
                .map(|v| format_currency_thousands(Some(v)));
            (field, formatted)
        })
        .collect()
}
