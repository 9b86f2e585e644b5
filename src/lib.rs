//! Textplate - Typed placeholder templates
//!
//! This library parses text templates with embedded placeholders such as
//! `{count:I|0|one|two}`, generates one typed input per declared variable
//! and renders the templates against the current input values.
//!
//! # Example
//!
//! ```rust
//! use textplate::render;
//!
//! let text = render("{n:I} {n} {mode:I|off|on}", &[("n", "7"), ("mode", "1")]).unwrap();
//! assert_eq!(text, "7 7 on");
//! ```

pub mod error;
pub mod locale;
pub mod node;
pub mod parser;
pub mod renderer;

pub use error::{ErrorCode, PlaceholderError, ValidationError, ValidationResult};
pub use locale::Catalog;
pub use node::{NodeConfig, NodeState, PlaceholderNode, Value};
pub use parser::{tokenize_template, ParseSession, Token};
pub use renderer::{NumberFormat, RenderError};

use thiserror::Error;

/// Errors that can occur in the one-shot render pipeline
#[derive(Debug, Error)]
pub enum TextplateError {
    /// Template or input rejected
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rendering failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Render one template with default configuration
///
/// Each assignment names an input and gives its value as text; see
/// [`PlaceholderNode::set_input`] for how the text is read.
///
/// # Example
///
/// ```rust
/// use textplate::render;
///
/// let text = render("{:B|Aus|Ein}", &[("Bool 1", "true")]).unwrap();
/// assert_eq!(text, "Ein");
/// ```
pub fn render(template: &str, assignments: &[(&str, &str)]) -> Result<String, TextplateError> {
    render_with_config(template, assignments, NodeConfig::default())
}

/// Render one template with custom configuration
///
/// # Example
///
/// ```rust
/// use textplate::{render_with_config, NodeConfig, NumberFormat};
///
/// let config = NodeConfig::new().with_number_format(
///     NumberFormat::new()
///         .with_group_separator(",")
///         .with_decimal_separator("."),
/// );
///
/// let text = render_with_config("{price:N2} EUR", &[("price", "1234.5")], config).unwrap();
/// assert_eq!(text, "1,234.50 EUR");
/// ```
pub fn render_with_config(
    template: &str,
    assignments: &[(&str, &str)],
    config: NodeConfig,
) -> Result<String, TextplateError> {
    let mut node = PlaceholderNode::with_templates(config, [template])?;
    for (name, raw) in assignments {
        node.set_input(name, raw)?;
    }
    Ok(node.render(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_unbound() {
        assert_eq!(render("{a:I} and {b:S}", &[]).unwrap(), "? and ?");
    }

    #[test]
    fn test_render_assignments() {
        let text = render("{who:S} has {n:I|none|one|two}", &[("who", "Ada"), ("n", "2")]);
        assert_eq!(text.unwrap(), "Ada has two");
    }

    #[test]
    fn test_render_validation_error() {
        let err = render("{x:Q}", &[]).unwrap_err();
        assert!(matches!(err, TextplateError::Validation(_)));
        assert!(err.to_string().contains("PlaceholderTypeInvalid"));
    }

    #[test]
    fn test_render_unknown_input() {
        let err = render("{x:I}", &[("y", "1")]).unwrap_err();
        assert!(matches!(
            err,
            TextplateError::Validation(ValidationError::UnknownInput { .. })
        ));
    }

    #[test]
    fn test_render_plain_text_allowed_by_config() {
        let config = NodeConfig::new().with_require_placeholders(false);
        assert_eq!(render_with_config("hello", &[], config).unwrap(), "hello");
        assert!(render("hello", &[]).is_err());
    }
}
