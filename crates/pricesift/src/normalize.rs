//! Locale-tolerant parsing of prices and quantities.
//!
//! Nothing in this module fails: text that cannot be read as a number yields the
//! caller's default.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Cell;

/// Default price when a cell is absent or unreadable.
pub const PRICE_DEFAULT: f64 = 0.0;

/// Default quantity when a cell is absent or unreadable.
pub const QUANTITY_DEFAULT: f64 = 1.0;

/// Tokens that spreadsheet exports use for "no value".
const PLACEHOLDERS: &[&str] = &["", "nan", "none"];

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.,\-]").unwrap());

/// True when `value` is blank or a placeholder token such as "nan" or "None".
pub fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

/// Parse free-form numeric text, returning `default` when it is not a number.
///
/// Handles `"1 234,56"`, `"1.234,56"`, `"1,234.56"`, currency suffixes such as
/// `"150 руб."` and non-breaking thousands separators.
pub fn parse_amount(raw: &str, default: f64) -> f64 {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return default;
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let kept = NON_NUMERIC.replace_all(&compact, "");
    let kept = kept.trim_end_matches(['.', ',']);
    let unified = unify_separators(kept);

    // Only a leading minus survives.
    let negative = unified.starts_with('-');
    let digits: String = unified.chars().filter(|&c| c != '-').collect();
    let candidate = if negative { format!("-{}", digits) } else { digits };

    match candidate.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Parse a price, defaulting to 0.0.
pub fn parse_price(raw: &str) -> f64 {
    parse_amount(raw, PRICE_DEFAULT)
}

/// Parse a quantity, defaulting to 1.0.
pub fn parse_quantity(raw: &str) -> f64 {
    parse_amount(raw, QUANTITY_DEFAULT)
}

/// Read a cell as an amount. Numeric cells are taken as-is.
pub fn cell_amount(cell: &Cell, default: f64) -> f64 {
    match cell {
        Cell::Empty => default,
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) => default,
        Cell::Text(s) => parse_amount(s, default),
    }
}

/// Round to two decimal places, the precision of a price total.
///
/// Rounds the exact binary value, so `2.675` (stored as 2.67499...) becomes
/// `2.67`, the same digits the value prints with at two places.
pub fn round_money(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Rewrite decimal and thousands separators so that only `.` marks decimals.
fn unify_separators(s: &str) -> String {
    let commas = s.matches(',').count();
    let dots = s.matches('.').count();

    match (commas, dots) {
        (0, 0) => s.to_string(),
        (_, 0) if commas == 1 => s.replace(',', "."),
        (_, 0) => s.replace(',', ""),
        (0, _) if dots == 1 => s.to_string(),
        (0, _) => s.replace('.', ""),
        _ => {
            let last_comma = s.rfind(',').unwrap_or(0);
            let last_dot = s.rfind('.').unwrap_or(0);
            if last_comma > last_dot {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
    }
}
