//! Number parsing with a fixed decimal separator

use thiserror::Error;

/// Why a piece of text is not a number
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    #[error("empty number")]
    Empty,
    #[error("malformed number")]
    Malformed,
    #[error("number out of range")]
    NotFinite,
}

/// Parse a finite real number written with `decimal` as its decimal separator.
///
/// Surrounding whitespace is ignored. Group separators, `inf` and `NaN` are
/// not accepted.
pub fn parse_number(text: &str, decimal: char) -> Result<f64, NumberError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NumberError::Empty);
    }
    if decimal != '.' && text.contains('.') {
        return Err(NumberError::Malformed);
    }

    let normalized: String = text
        .chars()
        .map(|c| if c == decimal { '.' } else { c })
        .collect();
    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return Err(NumberError::Malformed);
    }

    let value: f64 = normalized.parse().map_err(|_| NumberError::Malformed)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumberError::NotFinite)
    }
}

/// Parse a whole number, optionally signed
pub fn parse_integer(text: &str) -> Result<i64, NumberError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NumberError::Empty);
    }
    text.parse().map_err(|_| NumberError::Malformed)
}
