//! Error types for placeholder parsing and template validation

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::locale::Catalog;
use crate::parser::ast::VarKind;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// Stable error identifiers, also used as localization keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Placeholder grammar
    EmptyPlaceholder,
    PlaceholderNameInvalid,
    PlaceholderMultipleColon,
    PlaceholderNameNotFound,
    PlaceholderTypeInvalid,
    PlaceholderReuseWrongType,
    PlaceholderBinLengthInvalid,
    PlaceholderBinInvalidAssign,
    PlaceholderBinSameText,
    PlaceholderIntLengthInvalid,
    PlaceholderNumFormatInvalid,
    PlaceholderStrLengthInvalid,

    // Mapping lists
    MappingEmptyImplicitValue,
    MappingNoImplicitValues,
    MappingNoExplicitValues,
    MappingWrongAssignment,
    ExplicitMappingInvalidValue,
    ExplicitMappingInvRngVal,
    ExplicitMappingInvalidRange,
    ExplicitMappingInvertedRange,
    MappingNoImplicitTextValues,
    MappingNoOriginalTextValue,
    MappingWrongTextAssignment,

    // Template policy
    EmptyTemplate,
    NoPlaceholder,
    TooManyPlaceholders,
    TooManyBinPlaceholders,
    TooManyIntPlaceholders,
    TooManyNumPlaceholders,
    TooManyStrPlaceholders,

    // Separator configuration
    SeparatorGroupTooLong,
    SeparatorDecimalTooLong,
    SeparatorDecimalTooShort,
    SeparatorsIdentical,
}

impl ErrorCode {
    /// Every code, in declaration order
    pub const ALL: [ErrorCode; 34] = [
        ErrorCode::EmptyPlaceholder,
        ErrorCode::PlaceholderNameInvalid,
        ErrorCode::PlaceholderMultipleColon,
        ErrorCode::PlaceholderNameNotFound,
        ErrorCode::PlaceholderTypeInvalid,
        ErrorCode::PlaceholderReuseWrongType,
        ErrorCode::PlaceholderBinLengthInvalid,
        ErrorCode::PlaceholderBinInvalidAssign,
        ErrorCode::PlaceholderBinSameText,
        ErrorCode::PlaceholderIntLengthInvalid,
        ErrorCode::PlaceholderNumFormatInvalid,
        ErrorCode::PlaceholderStrLengthInvalid,
        ErrorCode::MappingEmptyImplicitValue,
        ErrorCode::MappingNoImplicitValues,
        ErrorCode::MappingNoExplicitValues,
        ErrorCode::MappingWrongAssignment,
        ErrorCode::ExplicitMappingInvalidValue,
        ErrorCode::ExplicitMappingInvRngVal,
        ErrorCode::ExplicitMappingInvalidRange,
        ErrorCode::ExplicitMappingInvertedRange,
        ErrorCode::MappingNoImplicitTextValues,
        ErrorCode::MappingNoOriginalTextValue,
        ErrorCode::MappingWrongTextAssignment,
        ErrorCode::EmptyTemplate,
        ErrorCode::NoPlaceholder,
        ErrorCode::TooManyPlaceholders,
        ErrorCode::TooManyBinPlaceholders,
        ErrorCode::TooManyIntPlaceholders,
        ErrorCode::TooManyNumPlaceholders,
        ErrorCode::TooManyStrPlaceholders,
        ErrorCode::SeparatorGroupTooLong,
        ErrorCode::SeparatorDecimalTooLong,
        ErrorCode::SeparatorDecimalTooShort,
        ErrorCode::SeparatorsIdentical,
    ];

    /// The localization key for this code
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyPlaceholder => "EmptyPlaceholder",
            ErrorCode::PlaceholderNameInvalid => "PlaceholderNameInvalid",
            ErrorCode::PlaceholderMultipleColon => "PlaceholderMultipleColon",
            ErrorCode::PlaceholderNameNotFound => "PlaceholderNameNotFound",
            ErrorCode::PlaceholderTypeInvalid => "PlaceholderTypeInvalid",
            ErrorCode::PlaceholderReuseWrongType => "PlaceholderReuseWrongType",
            ErrorCode::PlaceholderBinLengthInvalid => "PlaceholderBinLengthInvalid",
            ErrorCode::PlaceholderBinInvalidAssign => "PlaceholderBinInvalidAssign",
            ErrorCode::PlaceholderBinSameText => "PlaceholderBinSameText",
            ErrorCode::PlaceholderIntLengthInvalid => "PlaceholderIntLengthInvalid",
            ErrorCode::PlaceholderNumFormatInvalid => "PlaceholderNumFormatInvalid",
            ErrorCode::PlaceholderStrLengthInvalid => "PlaceholderStrLengthInvalid",
            ErrorCode::MappingEmptyImplicitValue => "MappingEmptyImplicitValue",
            ErrorCode::MappingNoImplicitValues => "MappingNoImplicitValues",
            ErrorCode::MappingNoExplicitValues => "MappingNoExplicitValues",
            ErrorCode::MappingWrongAssignment => "MappingWrongAssignment",
            ErrorCode::ExplicitMappingInvalidValue => "ExplicitMappingInvalidValue",
            ErrorCode::ExplicitMappingInvRngVal => "ExplicitMappingInvRngVal",
            ErrorCode::ExplicitMappingInvalidRange => "ExplicitMappingInvalidRange",
            ErrorCode::ExplicitMappingInvertedRange => "ExplicitMappingInvertedRange",
            ErrorCode::MappingNoImplicitTextValues => "MappingNoImplicitTextValues",
            ErrorCode::MappingNoOriginalTextValue => "MappingNoOriginalTextValue",
            ErrorCode::MappingWrongTextAssignment => "MappingWrongTextAssignment",
            ErrorCode::EmptyTemplate => "EmptyTemplate",
            ErrorCode::NoPlaceholder => "NoPlaceholder",
            ErrorCode::TooManyPlaceholders => "TooManyPlaceholders",
            ErrorCode::TooManyBinPlaceholders => "TooManyBinPlaceholders",
            ErrorCode::TooManyIntPlaceholders => "TooManyIntPlaceholders",
            ErrorCode::TooManyNumPlaceholders => "TooManyNumPlaceholders",
            ErrorCode::TooManyStrPlaceholders => "TooManyStrPlaceholders",
            ErrorCode::SeparatorGroupTooLong => "SeparatorGroupTooLong",
            ErrorCode::SeparatorDecimalTooLong => "SeparatorDecimalTooLong",
            ErrorCode::SeparatorDecimalTooShort => "SeparatorDecimalTooShort",
            ErrorCode::SeparatorsIdentical => "SeparatorsIdentical",
        }
    }

    /// The per-kind limit code for a variable kind
    pub fn too_many(kind: VarKind) -> Self {
        match kind {
            VarKind::Bool => ErrorCode::TooManyBinPlaceholders,
            VarKind::Int => ErrorCode::TooManyIntPlaceholders,
            VarKind::Real => ErrorCode::TooManyNumPlaceholders,
            VarKind::Str => ErrorCode::TooManyStrPlaceholders,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder that failed to parse, carried as data inside an error token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} in placeholder '{{{source_text}}}'")]
pub struct PlaceholderError {
    /// Placeholder body, without the delimiters
    pub source_text: String,
    pub code: ErrorCode,
    /// Byte range of the whole `{...}` in its template
    pub span: Span,
}

impl PlaceholderError {
    pub fn new(source_text: impl Into<String>, code: ErrorCode, span: Span) -> Self {
        Self {
            source_text: source_text.into(),
            code,
            span,
        }
    }
}

/// Template or session level validation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Group/decimal separator configuration is unusable
    #[error("invalid number separators: {0}")]
    Separator(ErrorCode),

    /// A whole template violates a policy
    #[error("template {}: {code}", .template + 1)]
    Template { template: usize, code: ErrorCode },

    /// A placeholder inside a template failed to parse
    #[error("template {}: {error}", .template + 1)]
    Placeholder {
        template: usize,
        error: PlaceholderError,
    },

    /// Template index outside the configured template count
    #[error("template index {index} out of range ({count} templates)")]
    InvalidIndex { index: usize, count: usize },

    /// No generated input carries this name
    #[error("no input named '{name}'")]
    UnknownInput { name: String },

    /// Raw text cannot be read as a value of the input's kind
    #[error("invalid {kind} value '{value}' for input '{name}'")]
    InvalidValue {
        name: String,
        kind: VarKind,
        value: String,
    },
}

impl ValidationError {
    /// The stable error code, for errors that have one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Separator(code) => Some(*code),
            Self::Template { code, .. } => Some(*code),
            Self::Placeholder { error, .. } => Some(error.code),
            _ => None,
        }
    }

    /// Index of the offending template, if the error belongs to one
    pub fn template(&self) -> Option<usize> {
        match self {
            Self::Template { template, .. } | Self::Placeholder { template, .. } => {
                Some(*template)
            }
            _ => None,
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Placeholder { error, .. } => Some(&error.span),
            _ => None,
        }
    }

    /// Convert into the host-facing result with a localized message
    pub fn to_result(&self, catalog: &Catalog, language: &str) -> ValidationResult {
        let message = match self {
            Self::Separator(code) => catalog.localize(language, code.as_str()),
            Self::Template { template, code } => format!(
                "{} {}: {}",
                catalog.localize(language, "Template"),
                template + 1,
                catalog.localize(language, code.as_str())
            ),
            Self::Placeholder { template, error } => format!(
                "{} {}: {} {{{}}}",
                catalog.localize(language, "Template"),
                template + 1,
                catalog.localize(language, error.code.as_str()),
                error.source_text
            ),
            other => other.to_string(),
        };
        ValidationResult::error(message)
    }

    /// Format the error with template context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = match self {
            Self::Placeholder { error, .. } => error.span.clone(),
            Self::Template { .. } => 0..source.len(),
            _ => return self.to_string(),
        };
        let message = self.code().map(ErrorCode::as_str).unwrap_or("error");

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Outcome of a validation pass as the host runtime consumes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_error: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_error: false,
            message: String::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings_are_unique() {
        let mut keys: Vec<_> = ErrorCode::ALL.iter().map(|c| c.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_placeholder_error_display() {
        let err = PlaceholderError::new("X:Q", ErrorCode::PlaceholderTypeInvalid, 4..9);
        assert_eq!(
            err.to_string(),
            "PlaceholderTypeInvalid in placeholder '{X:Q}'"
        );
    }

    #[test]
    fn test_validation_error_code() {
        let err = ValidationError::Template {
            template: 0,
            code: ErrorCode::NoPlaceholder,
        };
        assert_eq!(err.code(), Some(ErrorCode::NoPlaceholder));
        assert_eq!(err.template(), Some(0));
        assert_eq!(err.to_string(), "template 1: NoPlaceholder");

        let err = ValidationError::UnknownInput {
            name: "x".to_string(),
        };
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_to_result_is_localized() {
        let catalog = Catalog::default();
        let err = ValidationError::Separator(ErrorCode::SeparatorsIdentical);
        let result = err.to_result(&catalog, "en");
        assert!(result.is_error);
        assert_eq!(
            result.message,
            catalog.localize("en", "SeparatorsIdentical")
        );
        assert_ne!(result.message, "SeparatorsIdentical");
    }

    #[test]
    fn test_format_points_at_placeholder() {
        let source = "abc {X:Q} def";
        let err = ValidationError::Placeholder {
            template: 0,
            error: PlaceholderError::new("X:Q", ErrorCode::PlaceholderTypeInvalid, 4..9),
        };
        let report = err.format(source, "template 1");
        assert!(report.contains("PlaceholderTypeInvalid"));
        assert!(report.contains("template 1"));
    }
}
