//! Request parameter sanitization.
//!
//! Every sanitizer returns `None` for input that fails its pattern. Callers
//! treat a rejected parameter exactly like one that was never supplied.

use bankdir_query::types::{AssetRange, InstitutionType, Publication, Season, MAX_YEAR, MIN_YEAR};
use bankdir_query::SearchQuery;

use crate::directory::InstitutionKey;

pub const MAX_BANK_NO_LENGTH: usize = 5;
pub const MAX_TEXT_LENGTH: usize = 100;

/// Two ASCII letters, upper-cased after trimming (`" ks "` -> `"KS"`).
pub fn sanitize_state(input: &str) -> Option<String> {
    let upper = input.trim().to_ascii_uppercase();
    if upper.len() == 2 && upper.chars().all(|c| c.is_ascii_uppercase()) {
        Some(upper)
    } else {
        None
    }
}

/// A whole number between 1900 and 2100 inclusive, digits only.
pub fn sanitize_year(input: &str) -> Option<i32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed
        .parse::<i32>()
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}

pub fn sanitize_season(input: &str) -> Option<Season> {
    input.trim().to_ascii_lowercase().parse().ok()
}

/// One to five ASCII letters or digits, case preserved.
pub fn sanitize_bank_no(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if !trimmed.is_empty()
        && trimmed.len() <= MAX_BANK_NO_LENGTH
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Membership org code: lowercase ASCII letters and underscores only.
pub fn sanitize_org_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Strip control characters, trim, and cap at [`MAX_TEXT_LENGTH`] characters.
/// Empty results are rejected.
pub fn sanitize_text(input: &str) -> Option<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    let trimmed: String = cleaned.trim().chars().take(MAX_TEXT_LENGTH).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub fn sanitize_institution_type(input: &str) -> Option<InstitutionType> {
    input.trim().to_ascii_lowercase().parse().ok()
}

pub fn sanitize_asset_range(input: &str) -> Option<AssetRange> {
    input.trim().parse().ok()
}

/// A publication only when both halves are present and valid.
pub fn sanitize_publication(year: Option<&str>, season: Option<&str>) -> Option<Publication> {
    let year = year.and_then(sanitize_year)?;
    let season = season.and_then(sanitize_season)?;
    Some(Publication::new(year, season))
}

/// An institution key only when both the state and bank number are valid.
pub fn institution_key(state: Option<&str>, bank_no: Option<&str>) -> Option<InstitutionKey> {
    let state = state.and_then(sanitize_state)?;
    let bank_no = bank_no.and_then(sanitize_bank_no)?;
    Some(InstitutionKey::new(state, bank_no))
}

/// Build a search from raw query pairs. Both `key` and `key[]` spellings are
/// accepted for the multi-select dimensions; empty or invalid values are
/// dropped and repeats collapse. The last non-empty `q` wins.
pub fn search_query_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> SearchQuery
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = SearchQuery::default();
    for (key, value) in pairs {
        let value = value.as_ref();
        let key = key.as_ref();
        let key = key.strip_suffix("[]").unwrap_or(key);
        query = match key {
            "state" => match sanitize_state(value) {
                Some(state) => query.with_state(&state),
                None => query,
            },
            "type" => match sanitize_institution_type(value) {
                Some(t) => query.with_type(t),
                None => query,
            },
            "county" => match sanitize_text(value) {
                Some(county) => query.with_county(&county),
                None => query,
            },
            "membership" => match sanitize_org_code(value) {
                Some(code) => query.with_membership(&code),
                None => query,
            },
            "assets" => match sanitize_asset_range(value) {
                Some(range) => query.with_asset_range(range),
                None => query,
            },
            "q" => match sanitize_text(value) {
                Some(q) => query.with_text(&q),
                None => query,
            },
            _ => query,
        };
    }
    query
}
