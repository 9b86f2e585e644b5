//! Parser for placeholder templates

pub mod ast;
mod grammar;
pub mod lexer;
pub mod number;
pub mod session;

pub use ast::*;
pub use grammar::INTEGER_FORMAT;
pub use session::{KindCounts, ParseSession};

/// Tokenize one template in a fresh session
///
/// Names only resolve within this template; use a shared
/// [`ParseSession`] to let placeholders refer across templates.
pub fn tokenize_template(template: &str, decimal_separator: char) -> Vec<Token> {
    ParseSession::new(decimal_separator).tokenize_template(template)
}
