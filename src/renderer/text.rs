//! Rendering of token sequences against bound input values

use thiserror::Error;

use super::config::NumberFormat;
use super::format::{format_integer, format_real};
use crate::error::PlaceholderError;
use crate::node::inputs::{InputBank, Value};
use crate::parser::ast::{InputHandle, Presentation, Token};

/// Text shown for a placeholder whose input has no value yet
pub const UNBOUND_TEXT: &str = "?";

/// Errors that can occur while rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// An error token reached the renderer
    #[error("cannot render invalid placeholder: {0}")]
    InvalidPlaceholder(PlaceholderError),

    /// Template index outside the node's template list
    #[error("template index {index} out of range ({count} templates)")]
    MissingTemplate { index: usize, count: usize },
}

/// Concatenate the rendering of every token
pub fn render(
    tokens: &[Token],
    inputs: &InputBank,
    format: &NumberFormat,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&render_token(token, inputs, format)?);
    }
    Ok(out)
}

pub fn render_token(
    token: &Token,
    inputs: &InputBank,
    format: &NumberFormat,
) -> Result<String, RenderError> {
    match token {
        Token::ConstText(text) => Ok(text.clone()),
        Token::Error(error) => Err(RenderError::InvalidPlaceholder(error.clone())),
        Token::Var(variable) => Ok(render_value(
            &variable.presentation,
            lookup(inputs, variable.binding()),
            format,
        )),
        Token::Reference(reference) => Ok(render_value(
            &reference.presentation,
            lookup(inputs, reference.target.binding()),
            format,
        )),
    }
}

fn lookup(inputs: &InputBank, handle: Option<InputHandle>) -> Option<Value> {
    handle.and_then(|handle| inputs.value(handle))
}

/// Render one value through a placeholder's mappings and format.
///
/// The first matching numeric mapping wins. Text mappings all apply, in
/// order, each to the output of the previous one.
pub fn render_value(
    presentation: &Presentation,
    value: Option<Value>,
    format: &NumberFormat,
) -> String {
    let Some(value) = value else {
        return UNBOUND_TEXT.to_string();
    };

    match value {
        Value::Bool(flag) => mapped(presentation, if flag { 1.0 } else { 0.0 })
            .unwrap_or_else(|| if flag { "1" } else { "0" }.to_string()),
        Value::Int(number) => {
            mapped(presentation, number as f64).unwrap_or_else(|| format_integer(number))
        }
        Value::Real(number) => mapped(presentation, number)
            .unwrap_or_else(|| format_real(number, &presentation.format, format)),
        Value::Text(text) => presentation
            .text_mappings
            .iter()
            .flatten()
            .fold(text, |text, mapping| mapping.apply(&text)),
    }
}

fn mapped(presentation: &Presentation, value: f64) -> Option<String> {
    presentation
        .numeric_mappings
        .as_ref()?
        .iter()
        .find(|mapping| mapping.matches(value))
        .map(|mapping| mapping.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{NumericMapping, TextMapping};

    fn with_mappings(mappings: Vec<NumericMapping>) -> Presentation {
        Presentation {
            numeric_mappings: Some(mappings),
            ..Presentation::default()
        }
    }

    #[test]
    fn test_unbound_renders_question_mark() {
        let format = NumberFormat::default();
        assert_eq!(render_value(&Presentation::default(), None, &format), "?");
    }

    #[test]
    fn test_bool_default() {
        let format = NumberFormat::default();
        let plain = Presentation::default();
        assert_eq!(render_value(&plain, Some(Value::Bool(true)), &format), "1");
        assert_eq!(render_value(&plain, Some(Value::Bool(false)), &format), "0");
    }

    #[test]
    fn test_first_matching_mapping_wins() {
        let format = NumberFormat::default();
        let presentation = with_mappings(vec![
            NumericMapping::range((0.0, false), (10.0, false), "low"),
            NumericMapping::exact(5.0, "five"),
        ]);
        assert_eq!(
            render_value(&presentation, Some(Value::Int(5)), &format),
            "low"
        );
        assert_eq!(
            render_value(&presentation, Some(Value::Int(11)), &format),
            "11"
        );
    }

    #[test]
    fn test_real_falls_back_to_format() {
        let format = NumberFormat::default();
        let presentation = Presentation {
            format: "F1".to_string(),
            numeric_mappings: Some(vec![NumericMapping::exact(0.0, "zero")]),
            text_mappings: None,
        };
        assert_eq!(
            render_value(&presentation, Some(Value::Real(0.0)), &format),
            "zero"
        );
        assert_eq!(
            render_value(&presentation, Some(Value::Real(2.26)), &format),
            "2,3"
        );
    }

    #[test]
    fn test_text_mappings_chain() {
        let format = NumberFormat::default();
        let presentation = Presentation {
            text_mappings: Some(vec![TextMapping::new("a", "b"), TextMapping::new("b", "c")]),
            ..Presentation::default()
        };
        assert_eq!(
            render_value(&presentation, Some(Value::Text("ab".to_string())), &format),
            "cc"
        );
    }

    #[test]
    fn test_error_token_fails() {
        let inputs = InputBank::default();
        let tokens = vec![
            Token::ConstText("x".to_string()),
            Token::Error(PlaceholderError::new(
                "",
                crate::error::ErrorCode::EmptyPlaceholder,
                1..3,
            )),
        ];
        let err = render(&tokens, &inputs, &NumberFormat::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidPlaceholder(_)));
    }
}
