// Utility helpers for parsing and number formatting.
//
// All the "dirty" CSV number handling lives here so the rest of the code can
// assume typed values where missing means `None`.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, forgiving common CSV export noise.
///
/// - Trims whitespace and strips thousands separators.
/// - Rejects values containing alphabetic characters or symbols such as
///   the `≤100` buckets in ad-library exports.
/// - Rejects `NaN`/infinite results.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative count. Accepts `"1,234"` and integral floats like
/// `"1234.0"`, which pandas-produced CSVs sometimes contain.
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match parse_f64_safe(Some(&s)) {
        // `u64::MAX as f64` rounds up to 2^64, hence the strict bound
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 => Some(v as u64),
        _ => None,
    }
}

/// Trimmed, non-empty text cell.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = match int_part.parse::<u64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render an optional aggregate. Undefined values print as `-`.
pub fn format_value(v: Option<f64>, is_count: bool) -> String {
    match v {
        Some(v) if is_count => format_number(v, 0),
        Some(v) => format_number(v, 2),
        None => "-".to_string(),
    }
}
