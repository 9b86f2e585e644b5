//! Template scanner splitting text around `{...}` placeholders, using logos

use logos::Logos;

use crate::parser::ast::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Fragment {
    // Innermost delimiter pair; nested braces never form one placeholder
    #[regex(r"\{[^{}]*\}")]
    Placeholder,

    #[regex(r"[^{]+")]
    Text,

    // An opening brace without a matching close is plain text
    #[token("{")]
    UnmatchedBrace,
}

/// One piece of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Constant text, possibly empty
    Text(&'a str),
    /// Placeholder body between the delimiters
    Placeholder { body: &'a str, span: Span },
}

impl Segment<'_> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder { .. })
    }
}

/// Split a template into alternating text and placeholder segments.
///
/// The result always starts and ends with a text segment, and every
/// placeholder is surrounded by text segments, even zero-length ones, so a
/// template with `n` placeholders yields `2n + 1` segments.
pub fn scan(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut lexer = Fragment::lexer(template);

    while let Some(fragment) = lexer.next() {
        if fragment == Ok(Fragment::Placeholder) {
            let span = lexer.span();
            segments.push(Segment::Text(&template[text_start..span.start]));
            segments.push(Segment::Placeholder {
                body: &template[span.start + 1..span.end - 1],
                span: span.clone(),
            });
            text_start = span.end;
        }
    }
    segments.push(Segment::Text(&template[text_start..]));
    segments
}
