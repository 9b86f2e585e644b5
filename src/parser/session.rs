//! Parse session: the variable registry shared by all templates of one node

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::error::ErrorCode;
use crate::parser::ast::{Span, Token, VarKind, Variable};
use crate::parser::grammar;
use crate::parser::lexer::{self, Segment};
use crate::renderer::NumberFormat;

/// Per-kind tally of variables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts([usize; 4]);

impl KindCounts {
    pub fn new(bools: usize, ints: usize, reals: usize, strs: usize) -> Self {
        Self([bools, ints, reals, strs])
    }

    /// Tally the kinds of a variable list
    pub fn of<'a>(variables: impl IntoIterator<Item = &'a Rc<Variable>>) -> Self {
        let mut counts = Self::default();
        for variable in variables {
            counts.increment(variable.kind);
        }
        counts
    }

    pub fn get(&self, kind: VarKind) -> usize {
        self.0[kind.index()]
    }

    /// Bump the counter for `kind`, returning its previous value
    pub fn increment(&mut self, kind: VarKind) -> usize {
        let slot = &mut self.0[kind.index()];
        let previous = *slot;
        *slot += 1;
        previous
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Registry of the variables declared during one full re-parse.
///
/// Names are unique within a session; a later placeholder using a registered
/// name becomes a reference to the earlier variable. Default names
/// (`Integer 1`, `Integer 2`, ...) are numbered per kind and restart with the
/// session.
#[derive(Debug)]
pub struct ParseSession {
    decimal_separator: char,
    registry: HashMap<String, Rc<Variable>>,
    variables: Vec<Rc<Variable>>,
    declared: KindCounts,
    default_names: KindCounts,
}

impl ParseSession {
    /// Start a session whose mapping numbers use `decimal_separator`
    pub fn new(decimal_separator: char) -> Self {
        Self {
            decimal_separator,
            registry: HashMap::new(),
            variables: Vec::new(),
            declared: KindCounts::default(),
            default_names: KindCounts::default(),
        }
    }

    /// Start a session for a separator configuration, validating it first
    pub fn for_format(format: &NumberFormat) -> Result<Self, ErrorCode> {
        format.validate()?;
        let decimal = format
            .decimal_char()
            .ok_or(ErrorCode::SeparatorDecimalTooShort)?;
        Ok(Self::new(decimal))
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Forget every registered name and reset default-name numbering
    pub fn restart(&mut self) {
        trace!(
            variables = self.variables.len(),
            "restarting parse session"
        );
        self.registry.clear();
        self.variables.clear();
        self.declared = KindCounts::default();
        self.default_names = KindCounts::default();
    }

    pub fn lookup(&self, name: &str) -> Option<&Rc<Variable>> {
        self.registry.get(name)
    }

    /// Variables declared so far, in first-seen order
    pub fn variables(&self) -> &[Rc<Variable>] {
        &self.variables
    }

    pub fn into_variables(self) -> Vec<Rc<Variable>> {
        self.variables
    }

    /// Number of declared variables per kind; references are not counted
    pub fn counts(&self) -> KindCounts {
        self.declared
    }

    /// Next generated name for `kind`, skipping names already taken
    pub(crate) fn next_default_name(&mut self, kind: VarKind) -> String {
        loop {
            let number = self.default_names.increment(kind) + 1;
            let name = format!("{} {}", kind.default_name_prefix(), number);
            if !self.registry.contains_key(&name) {
                return name;
            }
        }
    }

    pub(crate) fn register(&mut self, variable: Variable) -> Rc<Variable> {
        let variable = Rc::new(variable);
        self.declared.increment(variable.kind);
        self.registry
            .insert(variable.name.clone(), Rc::clone(&variable));
        self.variables.push(Rc::clone(&variable));
        variable
    }

    /// Parse one placeholder body; failures come back as an error token
    pub fn parse_placeholder(&mut self, body: &str, span: Span) -> Token {
        grammar::parse_placeholder(self, body, span)
    }

    /// Split a whole template into constant text and parsed placeholders
    pub fn tokenize_template(&mut self, template: &str) -> Vec<Token> {
        lexer::scan(template)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Token::ConstText(text.to_string()),
                Segment::Placeholder { body, span } => self.parse_placeholder(body, span),
            })
            .collect()
    }
}
