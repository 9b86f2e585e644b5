//! Token model produced by the placeholder parser

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::PlaceholderError;

pub use crate::error::Span;

/// Value type a placeholder variable declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Bool,
    Int,
    Real,
    Str,
}

impl VarKind {
    pub const ALL: [VarKind; 4] = [VarKind::Bool, VarKind::Int, VarKind::Real, VarKind::Str];

    /// Select a kind from the first letter of a format (case-insensitive)
    pub fn from_format_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'B' => Some(VarKind::Bool),
            'I' => Some(VarKind::Int),
            'F' | 'G' | 'N' | 'P' => Some(VarKind::Real),
            'S' => Some(VarKind::Str),
            _ => None,
        }
    }

    /// Prefix of generated names, e.g. `Integer` in `Integer 2`
    pub fn default_name_prefix(self) -> &'static str {
        match self {
            VarKind::Bool => "Bool",
            VarKind::Int => "Integer",
            VarKind::Real => "Number",
            VarKind::Str => "Text",
        }
    }

    /// Dense index, stable across the crate
    pub fn index(self) -> usize {
        match self {
            VarKind::Bool => 0,
            VarKind::Int => 1,
            VarKind::Real => 2,
            VarKind::Str => 3,
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Bool => write!(f, "bool"),
            VarKind::Int => write!(f, "integer"),
            VarKind::Real => write!(f, "number"),
            VarKind::Str => write!(f, "text"),
        }
    }
}

/// Maps a numeric value or range to display text
#[derive(Debug, Clone, PartialEq)]
pub struct NumericMapping {
    pub min: f64,
    pub max: f64,
    pub min_excluded: bool,
    pub max_excluded: bool,
    pub text: String,
}

impl NumericMapping {
    /// Mapping that matches exactly one value
    pub fn exact(value: f64, text: impl Into<String>) -> Self {
        Self {
            min: value,
            max: value,
            min_excluded: false,
            max_excluded: false,
            text: text.into(),
        }
    }

    /// Mapping over a range; unbounded sides use infinities
    pub fn range(
        (min, min_excluded): (f64, bool),
        (max, max_excluded): (f64, bool),
        text: impl Into<String>,
    ) -> Self {
        Self {
            min,
            max,
            min_excluded,
            max_excluded,
            text: text.into(),
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        let above_min = if self.min_excluded {
            value > self.min
        } else {
            value >= self.min
        };
        let below_max = if self.max_excluded {
            value < self.max
        } else {
            value <= self.max
        };
        above_min && below_max
    }
}

/// Literal substitution applied to string values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMapping {
    pub original: String,
    pub replacement: String,
}

impl TextMapping {
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.original, &self.replacement)
    }
}

/// Format letters and mappings declared by one placeholder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    /// Number format; empty for bool and string kinds
    pub format: String,
    pub numeric_mappings: Option<Vec<NumericMapping>>,
    pub text_mappings: Option<Vec<TextMapping>>,
}

impl Presentation {
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn has_format_or_mappings(&self) -> bool {
        self.format.chars().count() > 1
            || self.numeric_mappings.as_ref().is_some_and(|m| !m.is_empty())
            || self.text_mappings.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// Slot an input collection assigns to a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle {
    pub kind: VarKind,
    pub index: usize,
}

/// A declared placeholder variable
#[derive(Debug, PartialEq)]
pub struct Variable {
    pub kind: VarKind,
    pub name: String,
    pub is_default_name: bool,
    pub presentation: Presentation,
    binding: Cell<Option<InputHandle>>,
}

impl Variable {
    pub fn new(
        kind: VarKind,
        name: impl Into<String>,
        is_default_name: bool,
        presentation: Presentation,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            is_default_name,
            presentation,
            binding: Cell::new(None),
        }
    }

    /// The input this variable reads from, once the node has bound it
    pub fn binding(&self) -> Option<InputHandle> {
        self.binding.get()
    }

    pub(crate) fn bind(&self, handle: InputHandle) {
        self.binding.set(Some(handle));
    }

    pub fn has_format_or_mappings(&self) -> bool {
        self.presentation.has_format_or_mappings()
    }
}

/// A placeholder reusing a variable declared earlier in the session
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub name: String,
    pub is_default_name: bool,
    pub presentation: Presentation,
    pub target: Rc<Variable>,
}

impl Reference {
    /// Reference that displays exactly like its target
    pub fn inherit(name: impl Into<String>, target: Rc<Variable>) -> Self {
        Self {
            name: name.into(),
            is_default_name: false,
            presentation: target.presentation.clone(),
            target,
        }
    }

    pub fn has_format_or_mappings(&self) -> bool {
        self.presentation.has_format_or_mappings()
    }
}

/// One parsed fragment of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ConstText(String),
    Error(PlaceholderError),
    Var(Rc<Variable>),
    Reference(Reference),
}

impl Token {
    /// True for anything that came from a `{...}` span
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Token::ConstText(_))
    }

    /// Variable name of a var or reference token
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Var(var) => Some(&var.name),
            Token::Reference(reference) => Some(&reference.name),
            _ => None,
        }
    }

    /// Kind of the value this token renders
    pub fn kind(&self) -> Option<VarKind> {
        match self {
            Token::Var(var) => Some(var.kind),
            Token::Reference(reference) => Some(reference.target.kind),
            _ => None,
        }
    }
}
