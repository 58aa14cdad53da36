//! Pure input validators shared by the entity and the interactive shell.

use chrono::NaiveDate;

/// Date format accepted for software expiration dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Check whether `text` names a known product kind.
///
/// Input is normalized (trim + lowercase) before the membership check, so
/// `"  Hardware "` is accepted. Empty input is invalid, not an error.
pub fn is_valid_kind(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "hardware" | "software")
}

/// Check whether `text` is a real calendar date in `dd/mm/yyyy` form.
///
/// Any parse failure yields `false`; nothing escapes.
pub fn is_valid_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
}

/// Parse a price from free text.
///
/// Returns `None` when the text is not a number or the value is not a
/// positive finite number.
pub fn parse_price(text: &str) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Some(price),
        _ => None,
    }
}

/// Parse a stock quantity from free text.
///
/// Returns `None` for non-integers and negative values (the unsigned parse
/// rejects a leading minus sign).
pub fn parse_quantity(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok()
}
