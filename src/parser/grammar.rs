//! Placeholder grammar: `NAME:FORMAT|MAPPING|MAPPING...`
//!
//! The name and the `LOW..HIGH` range syntax are small chumsky grammars; the
//! rest is a split on `:`, `|` and `=` where every failure maps to one
//! stable [`ErrorCode`].

use chumsky::prelude::*;
use tracing::debug;

use crate::error::{ErrorCode, PlaceholderError};
use crate::parser::ast::{
    NumericMapping, Presentation, Reference, Span, TextMapping, Token, VarKind, Variable,
};
use crate::parser::number::parse_number;
use crate::parser::session::ParseSession;

/// Format stored for integer variables: shortest decimal representation
pub const INTEGER_FORMAT: &str = "D";

/// Which flavor of numeric mapping a placeholder has committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MappingMode {
    Undecided,
    Implicit,
    Explicit,
}

/// Parse one placeholder body into a variable, reference or error token
pub(crate) fn parse_placeholder(session: &mut ParseSession, body: &str, span: Span) -> Token {
    match parse_body(session, body) {
        Ok(token) => token,
        Err(code) => {
            debug!(%code, body, "placeholder rejected");
            Token::Error(PlaceholderError::new(body, code, span))
        }
    }
}

fn parse_body(session: &mut ParseSession, body: &str) -> Result<Token, ErrorCode> {
    if body.is_empty() {
        return Err(ErrorCode::EmptyPlaceholder);
    }

    let (raw_name, format_text) = match body.split_once(':') {
        Some((_, format)) if format.contains(':') => {
            return Err(ErrorCode::PlaceholderMultipleColon)
        }
        Some((name, format)) => (name, Some(format)),
        None => (body, None),
    };

    let name = raw_name.trim();
    if !name.is_empty() && !is_valid_name(name) {
        return Err(ErrorCode::PlaceholderNameInvalid);
    }
    let target = if name.is_empty() {
        None
    } else {
        session.lookup(name).cloned()
    };

    // Without a format a placeholder can only reuse an earlier declaration
    let format_text = match format_text {
        Some(text) if !text.is_empty() => text,
        _ => {
            return match target {
                Some(target) => Ok(Token::Reference(Reference::inherit(name, target))),
                None if format_text.is_some() => Err(ErrorCode::PlaceholderTypeInvalid),
                None => Err(ErrorCode::PlaceholderNameNotFound),
            };
        }
    };

    let mut items = format_text.split('|');
    let head = items.next().unwrap_or_default();
    let mappings: Vec<&str> = items.collect();

    let kind = head
        .chars()
        .next()
        .and_then(VarKind::from_format_letter)
        .ok_or(ErrorCode::PlaceholderTypeInvalid)?;
    if let Some(target) = &target {
        if target.kind != kind {
            return Err(ErrorCode::PlaceholderReuseWrongType);
        }
    }

    let presentation = parse_presentation(kind, head, &mappings, session.decimal_separator())?;

    let token = match target {
        Some(target) => Token::Reference(Reference {
            name: name.to_string(),
            is_default_name: false,
            presentation,
            target,
        }),
        None => {
            let (name, is_default_name) = if name.is_empty() {
                (session.next_default_name(kind), true)
            } else {
                (name.to_string(), false)
            };
            Token::Var(session.register(Variable::new(kind, name, is_default_name, presentation)))
        }
    };
    Ok(token)
}

/// A name starts with a letter, followed by letters, digits, punctuation or
/// spaces; delimiters and colons are never part of a name.
fn name_parser<'a>() -> impl Parser<'a, &'a str, (), extra::Err<Simple<'a, char>>> {
    any()
        .filter(|c: &char| c.is_alphabetic())
        .then(any().filter(|c: &char| is_name_char(*c)).repeated())
        .then_ignore(end())
        .ignored()
}

fn is_name_char(c: char) -> bool {
    !matches!(c, ':' | '{' | '}') && (c.is_alphanumeric() || c.is_ascii_punctuation() || c == ' ')
}

fn is_valid_name(name: &str) -> bool {
    name_parser().parse(name).into_result().is_ok()
}

/// `LOW..HIGH` with exactly one `..`; bounds are returned raw
fn range_parser<'a>() -> impl Parser<'a, &'a str, (String, String), extra::Err<Simple<'a, char>>>
{
    let bound = any()
        .and_is(just("..").not())
        .repeated()
        .collect::<String>();
    bound
        .clone()
        .then_ignore(just(".."))
        .then(bound)
        .then_ignore(end())
}

fn parse_presentation(
    kind: VarKind,
    head: &str,
    mappings: &[&str],
    decimal: char,
) -> Result<Presentation, ErrorCode> {
    let head_len = head.chars().count();
    match kind {
        VarKind::Bool => parse_bool(head, mappings),
        VarKind::Int => {
            if head_len != 1 {
                return Err(ErrorCode::PlaceholderIntLengthInvalid);
            }
            Ok(Presentation {
                format: INTEGER_FORMAT.to_string(),
                numeric_mappings: parse_numeric_mappings(mappings, true, decimal)?,
                text_mappings: None,
            })
        }
        VarKind::Real => {
            let precision_ok = match head_len {
                1 => true,
                2 => head.chars().last().is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if !precision_ok {
                return Err(ErrorCode::PlaceholderNumFormatInvalid);
            }
            Ok(Presentation {
                format: head.to_string(),
                numeric_mappings: parse_numeric_mappings(mappings, false, decimal)?,
                text_mappings: None,
            })
        }
        VarKind::Str => {
            if head_len > 1 {
                return Err(ErrorCode::PlaceholderStrLengthInvalid);
            }
            Ok(Presentation {
                format: String::new(),
                numeric_mappings: None,
                text_mappings: parse_text_mappings(mappings)?,
            })
        }
    }
}

/// `B`, `BNY` (single-char glyphs) or `B|off|on`
fn parse_bool(head: &str, mappings: &[&str]) -> Result<Presentation, ErrorCode> {
    let glyphs: Vec<char> = head.chars().collect();
    let (off, on) = match (glyphs.as_slice(), mappings) {
        ([_], []) => return Ok(Presentation::default()),
        ([_, off, on], []) => (off.to_string(), on.to_string()),
        ([_], [off, on]) => (off.to_string(), on.to_string()),
        _ => return Err(ErrorCode::PlaceholderBinLengthInvalid),
    };
    if off.contains('=') || on.contains('=') {
        return Err(ErrorCode::PlaceholderBinInvalidAssign);
    }
    if off == on {
        return Err(ErrorCode::PlaceholderBinSameText);
    }
    Ok(Presentation {
        format: String::new(),
        numeric_mappings: Some(vec![
            NumericMapping::exact(0.0, off),
            NumericMapping::exact(1.0, on),
        ]),
        text_mappings: None,
    })
}

/// Numeric mappings are either all implicit (`text`, numbered 0, 1, 2, ...)
/// or all explicit (`value=text`, `LOW..HIGH=text`). The first mapping
/// decides which.
fn parse_numeric_mappings(
    items: &[&str],
    allow_implicit: bool,
    decimal: char,
) -> Result<Option<Vec<NumericMapping>>, ErrorCode> {
    if items.is_empty() {
        return Ok(None);
    }

    let mut mode = MappingMode::Undecided;
    let mut next_implicit = 0u32;
    let mut mappings = Vec::with_capacity(items.len());

    for item in items {
        let parts: Vec<&str> = item.split('=').collect();
        match parts.as_slice() {
            [text] => {
                if !allow_implicit || mode == MappingMode::Explicit {
                    return Err(ErrorCode::MappingNoImplicitValues);
                }
                if text.is_empty() {
                    return Err(ErrorCode::MappingEmptyImplicitValue);
                }
                mode = MappingMode::Implicit;
                mappings.push(NumericMapping::exact(f64::from(next_implicit), *text));
                next_implicit += 1;
            }
            [spec, text] => {
                if mode == MappingMode::Implicit {
                    return Err(ErrorCode::MappingNoExplicitValues);
                }
                mode = MappingMode::Explicit;
                mappings.push(parse_value_spec(spec, text, decimal)?);
            }
            _ => return Err(ErrorCode::MappingWrongAssignment),
        }
    }
    Ok(Some(mappings))
}

fn parse_value_spec(spec: &str, text: &str, decimal: char) -> Result<NumericMapping, ErrorCode> {
    let spec = spec.trim();
    if !spec.contains("..") {
        let value =
            parse_number(spec, decimal).map_err(|_| ErrorCode::ExplicitMappingInvalidValue)?;
        return Ok(NumericMapping::exact(value, text));
    }

    let (low, high) = range_parser()
        .parse(spec)
        .into_result()
        .map_err(|_| ErrorCode::ExplicitMappingInvalidRange)?;
    // `1...2` splits as `1` and `.2`
    if high.starts_with('.') {
        return Err(ErrorCode::ExplicitMappingInvalidRange);
    }

    let low = parse_bound(&low, f64::NEG_INFINITY, decimal)?;
    let high = parse_bound(&high, f64::INFINITY, decimal)?;
    if low.0 > high.0 {
        return Err(ErrorCode::ExplicitMappingInvertedRange);
    }
    Ok(NumericMapping::range(low, high, text))
}

/// A range bound: empty for unbounded, `>`/`<` prefix for an excluded bound
fn parse_bound(raw: &str, unbounded: f64, decimal: char) -> Result<(f64, bool), ErrorCode> {
    let raw = raw.trim();
    let (excluded, number) = match raw.strip_prefix(|c: char| c == '>' || c == '<') {
        Some(rest) => (true, rest.trim()),
        None => (false, raw),
    };
    if number.is_empty() {
        return Ok((unbounded, excluded));
    }
    let value = parse_number(number, decimal).map_err(|_| ErrorCode::ExplicitMappingInvRngVal)?;
    Ok((value, excluded))
}

fn parse_text_mappings(items: &[&str]) -> Result<Option<Vec<TextMapping>>, ErrorCode> {
    if items.is_empty() {
        return Ok(None);
    }
    items
        .iter()
        .map(|item| {
            let parts: Vec<&str> = item.split('=').collect();
            match parts.as_slice() {
                [_] => Err(ErrorCode::MappingNoImplicitTextValues),
                ["", _] => Err(ErrorCode::MappingNoOriginalTextValue),
                [original, replacement] => Ok(TextMapping::new(*original, *replacement)),
                _ => Err(ErrorCode::MappingWrongTextAssignment),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(body: &str) -> Token {
        let mut session = ParseSession::new(',');
        parse_placeholder(&mut session, body, 0..body.len() + 2)
    }

    fn code(body: &str) -> Option<ErrorCode> {
        match parse(body) {
            Token::Error(err) => Some(err.code),
            _ => None,
        }
    }

    fn var(token: &Token) -> &Variable {
        match token {
            Token::Var(var) => var,
            other => panic!("Expected Var, got {:?}", other),
        }
    }

    fn numeric(body: &str) -> Vec<NumericMapping> {
        let token = parse(body);
        var(&token)
            .presentation
            .numeric_mappings
            .clone()
            .expect("Should have mappings")
    }

    // ==================== Names and Structure ====================

    #[test]
    fn test_empty_placeholder() {
        assert_eq!(code(""), Some(ErrorCode::EmptyPlaceholder));
    }

    #[test]
    fn test_multiple_colons() {
        assert_eq!(code("a:I:x"), Some(ErrorCode::PlaceholderMultipleColon));
        assert_eq!(code("::"), Some(ErrorCode::PlaceholderMultipleColon));
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(code("1a:I"), Some(ErrorCode::PlaceholderNameInvalid));
        assert_eq!(code("-x:I"), Some(ErrorCode::PlaceholderNameInvalid));
    }

    #[test]
    fn test_valid_names() {
        for body in ["Input 1:I", "temp.outside:N1", "Größe:N", "a_b-c (x):S"] {
            assert_eq!(code(body), None, "{body} should parse");
        }
        let token = parse("  spaced  :I");
        assert_eq!(var(&token).name, "spaced");
    }

    #[test]
    fn test_bare_name_must_exist() {
        assert_eq!(code("unknown"), Some(ErrorCode::PlaceholderNameNotFound));
        assert_eq!(code(" "), Some(ErrorCode::PlaceholderNameNotFound));
        assert_eq!(code("x:"), Some(ErrorCode::PlaceholderTypeInvalid));
    }

    #[test]
    fn test_type_letters() {
        assert_eq!(code(":Q"), Some(ErrorCode::PlaceholderTypeInvalid));
        assert_eq!(code(":|a=b"), Some(ErrorCode::PlaceholderTypeInvalid));
        assert_eq!(parse(":b").kind(), Some(VarKind::Bool));
        assert_eq!(parse(":i").kind(), Some(VarKind::Int));
        assert_eq!(parse(":g").kind(), Some(VarKind::Real));
        assert_eq!(parse(":s").kind(), Some(VarKind::Str));
    }

    #[test]
    fn test_default_name_generated() {
        let mut session = ParseSession::new(',');
        let first = parse_placeholder(&mut session, ":N", 0..4);
        let second = parse_placeholder(&mut session, ":N2", 4..9);
        let other = parse_placeholder(&mut session, ":S", 9..13);
        assert_eq!(var(&first).name, "Number 1");
        assert!(var(&first).is_default_name);
        assert_eq!(var(&second).name, "Number 2");
        assert_eq!(var(&other).name, "Text 1");
    }

    #[test]
    fn test_error_token_keeps_source() {
        match parse("x:Z") {
            Token::Error(err) => {
                assert_eq!(err.source_text, "x:Z");
                assert_eq!(err.span, 0..5);
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    // ==================== References ====================

    #[test]
    fn test_bare_reference_inherits() {
        let mut session = ParseSession::new(',');
        let declared = parse_placeholder(&mut session, "x:I|0|a|b", 0..11);
        let reused = parse_placeholder(&mut session, "x", 12..15);
        match reused {
            Token::Reference(reference) => {
                assert_eq!(reference.name, "x");
                assert_eq!(reference.presentation, var(&declared).presentation);
                assert!(std::rc::Rc::ptr_eq(
                    &reference.target,
                    match &declared {
                        Token::Var(v) => v,
                        _ => unreachable!(),
                    }
                ));
            }
            other => panic!("Expected Reference, got {:?}", other),
        }
        assert_eq!(session.counts().total(), 1);
    }

    #[test]
    fn test_reference_with_own_format() {
        let mut session = ParseSession::new(',');
        parse_placeholder(&mut session, "t:N1", 0..6);
        match parse_placeholder(&mut session, "t:F3", 6..12) {
            Token::Reference(reference) => assert_eq!(reference.presentation.format, "F3"),
            other => panic!("Expected Reference, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_wrong_type() {
        let mut session = ParseSession::new(',');
        parse_placeholder(&mut session, "Input 1:S", 0..11);
        match parse_placeholder(&mut session, "Input 1:I", 11..22) {
            Token::Error(err) => assert_eq!(err.code, ErrorCode::PlaceholderReuseWrongType),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_to_default_name() {
        let mut session = ParseSession::new(',');
        parse_placeholder(&mut session, ":I", 0..4);
        match parse_placeholder(&mut session, "Integer 1", 4..15) {
            Token::Reference(reference) => assert!(!reference.is_default_name),
            other => panic!("Expected Reference, got {:?}", other),
        }
    }

    // ==================== Bool ====================

    #[test]
    fn test_bool_plain() {
        let token = parse("flag:B");
        assert_eq!(var(&token).presentation, Presentation::default());
    }

    #[test]
    fn test_bool_glyphs() {
        assert_eq!(
            numeric(":BNY"),
            vec![
                NumericMapping::exact(0.0, "N"),
                NumericMapping::exact(1.0, "Y")
            ]
        );
    }

    #[test]
    fn test_bool_texts() {
        assert_eq!(
            numeric(":B|Aus|Ein"),
            vec![
                NumericMapping::exact(0.0, "Aus"),
                NumericMapping::exact(1.0, "Ein")
            ]
        );
    }

    #[test]
    fn test_bool_errors() {
        assert_eq!(code(":BX"), Some(ErrorCode::PlaceholderBinLengthInvalid));
        assert_eq!(code(":B|on"), Some(ErrorCode::PlaceholderBinLengthInvalid));
        assert_eq!(code(":B|a|b|c"), Some(ErrorCode::PlaceholderBinLengthInvalid));
        assert_eq!(code(":BNY|a|b"), Some(ErrorCode::PlaceholderBinLengthInvalid));
        assert_eq!(code(":B|a=1|b"), Some(ErrorCode::PlaceholderBinInvalidAssign));
        assert_eq!(code(":B|same|same"), Some(ErrorCode::PlaceholderBinSameText));
        assert_eq!(code(":BXX"), Some(ErrorCode::PlaceholderBinSameText));
    }

    // ==================== Integer ====================

    #[test]
    fn test_int_format_is_fixed() {
        let token = parse("n:I");
        assert_eq!(var(&token).presentation.format, INTEGER_FORMAT);
        assert!(!var(&token).has_format_or_mappings());
        assert_eq!(code("n:I2"), Some(ErrorCode::PlaceholderIntLengthInvalid));
    }

    #[test]
    fn test_int_implicit_mappings() {
        assert_eq!(
            numeric("v:I|0|Komfort|Standby|Nacht"),
            vec![
                NumericMapping::exact(0.0, "0"),
                NumericMapping::exact(1.0, "Komfort"),
                NumericMapping::exact(2.0, "Standby"),
                NumericMapping::exact(3.0, "Nacht"),
            ]
        );
    }

    #[test]
    fn test_int_explicit_mappings() {
        assert_eq!(
            numeric("v:I|1=one|2..5=few|>5..=many"),
            vec![
                NumericMapping::exact(1.0, "one"),
                NumericMapping::range((2.0, false), (5.0, false), "few"),
                NumericMapping::range((5.0, true), (f64::INFINITY, false), "many"),
            ]
        );
    }

    #[test]
    fn test_implicit_and_explicit_are_exclusive() {
        assert_eq!(code(":I|a|1=b"), Some(ErrorCode::MappingNoExplicitValues));
        assert_eq!(code(":I|1=b|a"), Some(ErrorCode::MappingNoImplicitValues));
    }

    #[test]
    fn test_empty_implicit_value() {
        assert_eq!(code(":I|a||c"), Some(ErrorCode::MappingEmptyImplicitValue));
    }

    #[test]
    fn test_wrong_assignment() {
        assert_eq!(code(":I|1=a=b"), Some(ErrorCode::MappingWrongAssignment));
    }

    // ==================== Real ====================

    #[test]
    fn test_real_formats() {
        for body in [":F", ":N2", ":g9", ":P0"] {
            assert_eq!(code(body), None, "{body} should parse");
        }
        let token = parse(":N2");
        assert_eq!(var(&token).presentation.format, "N2");
        assert_eq!(code(":Nx"), Some(ErrorCode::PlaceholderNumFormatInvalid));
        assert_eq!(code(":N12"), Some(ErrorCode::PlaceholderNumFormatInvalid));
    }

    #[test]
    fn test_real_disallows_implicit() {
        assert_eq!(code(":N|low|high"), Some(ErrorCode::MappingNoImplicitValues));
    }

    #[test]
    fn test_real_ranges_with_decimal_comma() {
        assert_eq!(
            numeric(":N1|..<0,5=low|0,5..=high"),
            vec![
                NumericMapping::range((f64::NEG_INFINITY, false), (0.5, true), "low"),
                NumericMapping::range((0.5, false), (f64::INFINITY, false), "high"),
            ]
        );
    }

    #[test]
    fn test_real_ranges_with_decimal_point() {
        let mut session = ParseSession::new('.');
        let token = parse_placeholder(&mut session, ":F|1.5..2.5=mid", 0..17);
        assert_eq!(
            var(&token).presentation.numeric_mappings,
            Some(vec![NumericMapping::range((1.5, false), (2.5, false), "mid")])
        );
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(code(":N|x=a"), Some(ErrorCode::ExplicitMappingInvalidValue));
        assert_eq!(code(":N|=a"), Some(ErrorCode::ExplicitMappingInvalidValue));
        assert_eq!(code(":N|1..x=a"), Some(ErrorCode::ExplicitMappingInvRngVal));
        assert_eq!(code(":N|1..2..3=a"), Some(ErrorCode::ExplicitMappingInvalidRange));
        assert_eq!(code(":N|1...3=a"), Some(ErrorCode::ExplicitMappingInvalidRange));
        assert_eq!(code(":N|5..1=a"), Some(ErrorCode::ExplicitMappingInvertedRange));
    }

    // ==================== String ====================

    #[test]
    fn test_string_plain() {
        let token = parse("label:S");
        assert_eq!(var(&token).presentation, Presentation::default());
        assert_eq!(code("label:Sx"), Some(ErrorCode::PlaceholderStrLengthInvalid));
    }

    #[test]
    fn test_string_mappings() {
        let token = parse(":S|on=an|off=aus|=");
        assert_eq!(token.kind(), None);
        assert_eq!(code(":S|on=an|off=aus|=x"), Some(ErrorCode::MappingNoOriginalTextValue));

        let token = parse(":S|on=an|off=aus");
        assert_eq!(
            var(&token).presentation.text_mappings,
            Some(vec![TextMapping::new("on", "an"), TextMapping::new("off", "aus")])
        );
    }

    #[test]
    fn test_string_mapping_errors() {
        assert_eq!(code(":S|word"), Some(ErrorCode::MappingNoImplicitTextValues));
        assert_eq!(code(":S|a=b=c"), Some(ErrorCode::MappingWrongTextAssignment));
    }
}
