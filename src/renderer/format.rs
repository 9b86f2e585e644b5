//! Locale-aware number formatting
//!
//! Format letters: `F` fixed point, `N` fixed point with digit grouping,
//! `P` percent, `G` general. An optional digit sets the number of decimals
//! (significant digits for `G`).

use super::config::NumberFormat;

const DEFAULT_DECIMALS: usize = 2;

/// Integers print in their shortest form without grouping
pub fn format_integer(value: i64) -> String {
    value.to_string()
}

pub fn format_real(value: f64, format: &str, separators: &NumberFormat) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let mut chars = format.chars();
    let letter = chars.next().map(|c| c.to_ascii_uppercase()).unwrap_or('G');
    let precision = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize);

    let group = separators.group_separator.as_str();
    let decimal = separators.decimal_separator.as_str();
    match letter {
        'F' => fixed(value, precision.unwrap_or(DEFAULT_DECIMALS), "", decimal),
        'N' => fixed(value, precision.unwrap_or(DEFAULT_DECIMALS), group, decimal),
        'P' => format!(
            "{} %",
            fixed(value * 100.0, precision.unwrap_or(DEFAULT_DECIMALS), group, decimal)
        ),
        'D' => fixed(value.round(), 0, "", decimal),
        _ => general(value, precision, decimal),
    }
}

fn fixed(value: f64, decimals: usize, group: &str, decimal: &str) -> String {
    localize(&format!("{:.*}", decimals, value), group, decimal)
}

fn general(value: f64, significant: Option<usize>, decimal: &str) -> String {
    let text = match significant {
        None | Some(0) => value.to_string(),
        Some(digits) => round_significant(value, digits),
    };
    localize(&text, "", decimal)
}

fn round_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = if decimals == 0 {
        let scale = 10f64.powi(magnitude + 1 - digits);
        format!("{:.0}", (value / scale).round() * scale)
    } else {
        format!("{:.*}", decimals, value)
    };
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Rewrite Rust's `-1234.5` notation with the configured separators
fn localize(text: &str, group: &str, decimal: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(text.len() + integer.len() / 3 * group.len());
    out.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push_str(group);
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push_str(decimal);
        out.push_str(fraction);
    }
    out
}
