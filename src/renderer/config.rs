//! Separator configuration for number formatting

use crate::error::ErrorCode;

/// Group and decimal separators used to parse mapping values and to
/// format rendered numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    /// Inserted between groups of three integer digits; may be empty
    pub group_separator: String,

    /// Exactly one character
    pub decimal_separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            group_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}

impl NumberFormat {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group separator
    pub fn with_group_separator(mut self, separator: impl Into<String>) -> Self {
        self.group_separator = separator.into();
        self
    }

    /// Set the decimal separator
    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = separator.into();
        self
    }

    /// Check lengths and distinctness of the separators
    pub fn validate(&self) -> Result<(), ErrorCode> {
        let group_len = self.group_separator.chars().count();
        let decimal_len = self.decimal_separator.chars().count();
        if group_len > 1 {
            return Err(ErrorCode::SeparatorGroupTooLong);
        }
        if decimal_len > 1 {
            return Err(ErrorCode::SeparatorDecimalTooLong);
        }
        if decimal_len == 0 {
            return Err(ErrorCode::SeparatorDecimalTooShort);
        }
        if self.group_separator == self.decimal_separator {
            return Err(ErrorCode::SeparatorsIdentical);
        }
        Ok(())
    }

    /// The decimal separator, if it is a single character
    pub fn decimal_char(&self) -> Option<char> {
        let mut chars = self.decimal_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}
