//! Column classifier.
//!
//! Heuristics that decide which filter widget a column gets in the UI:
//! date-like columns get a range picker, numeric columns get comparison
//! operators, everything else is treated as text. Matching is
//! substring-based and intentionally loose; the token lists come from
//! [`ClassifierSettings`] and can be overridden in configuration.

use crate::config::ClassifierSettings;

/// True if the declared type is a date/time type.
///
/// Substring match so parameterized forms (`TIMESTAMP_NTZ(9)`) hit too.
pub fn is_date_type(declared_type: &str, settings: &ClassifierSettings) -> bool {
    let ty = declared_type.to_uppercase();
    settings.date_types.iter().any(|t| ty.contains(t.as_str()))
}

/// True if the column should be offered a date-range filter.
///
/// A date/time declared type always qualifies. Otherwise the column name
/// is matched against the date-name tokens, which catches date values
/// stored as text (`CREATED_AT VARCHAR`, `取引日 VARCHAR`).
pub fn is_date_like(name: &str, declared_type: &str, settings: &ClassifierSettings) -> bool {
    if is_date_type(declared_type, settings) {
        return true;
    }
    let name = name.to_uppercase();
    settings
        .date_name_tokens
        .iter()
        .any(|t| name.contains(t.as_str()))
}

/// True if the declared type is numeric.
pub fn is_numeric(declared_type: &str, settings: &ClassifierSettings) -> bool {
    let ty = declared_type.to_uppercase();
    settings
        .numeric_types
        .iter()
        .any(|t| ty.contains(t.as_str()))
}
