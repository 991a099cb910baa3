//! Deterministic value formatting for table cells and series points.
//!
//! Every formatter here is a pure function of its input; output never
//! depends on process locale, clock, or environment.

use serde_json::Value;

use crate::payload::FieldKind;
use crate::util::parse_datetime;

/// Sentinel rendered for values that are absent or not displayable
pub(crate) const MISSING: &str = "-";

/// Lenient numeric read of a raw cell value
///
/// Numbers pass through; strings parse by their longest numeric prefix, the
/// way lenient front-end parsing treats `"42 calls"` as 42. Anything else,
/// and non-finite results, read as no value.
pub(crate) fn numeric_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_float(s),
        _ => None,
    }
}

/// Longest-numeric-prefix float parse
pub(crate) fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let mut end = trimmed.len();
    while end > 0 {
        if !trimmed.is_char_boundary(end) {
            end -= 1;
            continue;
        }
        if let Ok(value) = trimmed[..end].parse::<f64>() {
            return Some(value).filter(|v| v.is_finite());
        }
        end -= 1;
    }
    None
}

/// Format a raw scalar by its declared kind
///
/// `None` means the value is not displayable under that kind and the caller
/// should render the missing sentinel instead.
pub(crate) fn display_value(raw: &Value, kind: FieldKind) -> Option<String> {
    match kind {
        FieldKind::Currency => numeric_value(raw).map(format_currency),
        FieldKind::Percentage => numeric_value(raw).map(|v| format!("{v:.1}%")),
        FieldKind::Number => numeric_value(raw).map(format_number),
        FieldKind::Date => parse_datetime(raw).map(|dt| dt.format("%m/%d/%Y").to_string()),
        FieldKind::Text => scalar_text(raw),
    }
}

/// Plain stringification of a scalar; structured values are not displayable
pub(crate) fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `$1,234.56`, with the sign ahead of the symbol
pub(crate) fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_grouped(-value, 2))
    } else {
        format!("${}", format_grouped(value, 2))
    }
}

/// Grouped numeral: integers stay whole, fractions keep up to three digits
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_grouped(value, 0);
    }
    let mut formatted = format_grouped(value, 3);
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }
    formatted
}

/// Fixed-decimal rendering with `,` thousands separators
pub(crate) fn format_grouped(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (position, ch) in int_part.chars().enumerate() {
        let remaining = int_part.len() - position;
        if position > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
