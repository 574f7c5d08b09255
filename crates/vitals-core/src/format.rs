//! Stateless number formatting for console output.

use crate::types::Utilization;

/// Format a utilization with exactly one fractional digit, e.g. `50.0%`
#[must_use]
pub fn format_percent(value: Utilization) -> String {
    let raw = value.raw();
    format!("{}.{}%", raw / 10, raw % 10)
}

/// Format a byte count with thousands separators, e.g. `1,234,567`
#[must_use]
pub fn format_bytes(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
