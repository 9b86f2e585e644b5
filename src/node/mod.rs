//! Placeholder node: owns a list of templates, re-parses all of them on any
//! edit and keeps one typed input bound to every declared variable.
//!
//! A re-parse either succeeds as a whole or changes nothing: on failure the
//! node keeps its previous tokens, inputs and bindings and reports the error
//! (the node is then [`NodeState::Stale`]).

mod config;
pub mod inputs;

use std::rc::Rc;

use tracing::{debug, trace, warn};

pub use config::{ConfigError, NodeConfig};
pub use inputs::{Input, InputBank, InputSlots, Value};

use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::locale::Catalog;
use crate::parser::ast::{InputHandle, Token, VarKind, Variable};
use crate::parser::lexer::{self, Segment};
use crate::parser::session::{KindCounts, ParseSession};
use crate::renderer::{self, NumberFormat, RenderError};

/// Maximum number of declared variables of one kind
pub const MAX_PLACEHOLDERS_PER_KIND: usize = 50;

/// Maximum number of tokens (text and placeholders) in one template
pub const MAX_TEMPLATE_TOKENS: usize = 6 * MAX_PLACEHOLDERS_PER_KIND + 1;

/// Whether the node's tokens reflect its current template texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Every template parsed, every variable bound
    Idle,
    /// The last edit was rejected; tokens and bindings predate it
    Stale,
}

/// One template text and the tokens of its last successful parse
#[derive(Debug, Clone, Default)]
pub struct Template {
    text: String,
    tokens: Vec<Token>,
}

impl Template {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Result of parsing every template in one session
struct Reparsed {
    tokens: Vec<Vec<Token>>,
    variables: Vec<Rc<Variable>>,
}

#[derive(Debug)]
pub struct PlaceholderNode {
    config: NodeConfig,
    /// Separators of the last successful parse, used for rendering
    active_format: NumberFormat,
    templates: Vec<Template>,
    variables: Vec<Rc<Variable>>,
    inputs: InputBank,
    state: NodeState,
    last_error: Option<ValidationError>,
    revision: u64,
}

impl PlaceholderNode {
    /// Create a node without templates
    pub fn new(config: NodeConfig) -> Self {
        let active_format = match config.number_format.validate() {
            Ok(()) => config.number_format.clone(),
            Err(_) => NumberFormat::default(),
        };
        Self {
            config,
            active_format,
            templates: Vec::new(),
            variables: Vec::new(),
            inputs: InputBank::default(),
            state: NodeState::Idle,
            last_error: None,
            revision: 0,
        }
    }

    /// Create a node and parse its initial templates
    pub fn with_templates<S: Into<String>>(
        config: NodeConfig,
        texts: impl IntoIterator<Item = S>,
    ) -> Result<Self, ValidationError> {
        let mut node = Self::new(config);
        node.set_templates(texts)?;
        Ok(node)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Separators currently used for rendering
    pub fn number_format(&self) -> &NumberFormat {
        &self.active_format
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn tokens(&self, index: usize) -> Option<&[Token]> {
        self.templates.get(index).map(Template::tokens)
    }

    /// Bound variables in first-seen order
    pub fn variables(&self) -> &[Rc<Variable>] {
        &self.variables
    }

    pub fn inputs(&self) -> &InputBank {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut InputBank {
        &mut self.inputs
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    /// Bumped once per successful re-parse
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Host-facing outcome of the last re-parse
    pub fn validation_result(&self, catalog: &Catalog) -> ValidationResult {
        match &self.last_error {
            Some(err) => err.to_result(catalog, &self.config.language),
            None => ValidationResult::ok(),
        }
    }

    // ==================== Edits ====================

    /// Replace every template at once
    pub fn set_templates<S: Into<String>>(
        &mut self,
        texts: impl IntoIterator<Item = S>,
    ) -> Result<(), ValidationError> {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        self.templates.resize_with(texts.len(), Template::default);
        for (template, text) in self.templates.iter_mut().zip(texts) {
            template.text = text;
        }
        self.reparse()
    }

    /// Edit one template's text
    pub fn set_template(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let count = self.templates.len();
        let template = self
            .templates
            .get_mut(index)
            .ok_or(ValidationError::InvalidIndex { index, count })?;
        template.text = text.into();
        self.reparse()
    }

    /// Grow with empty templates or drop templates from the tail
    pub fn set_template_count(&mut self, count: usize) -> Result<(), ValidationError> {
        self.templates.resize_with(count, Template::default);
        self.reparse()
    }

    pub fn set_number_format(&mut self, format: NumberFormat) -> Result<(), ValidationError> {
        self.config.number_format = format;
        self.reparse()
    }

    pub fn set_require_placeholders(&mut self, required: bool) -> Result<(), ValidationError> {
        self.config.require_placeholders = required;
        self.reparse()
    }

    // ==================== Inputs ====================

    /// Display names of all inputs, grouped by kind
    pub fn input_names(&self) -> Vec<(InputHandle, &str)> {
        self.inputs
            .handles()
            .filter_map(|handle| Some((handle, self.inputs.name(handle)?)))
            .collect()
    }

    /// Assign a value to the input named `name`
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), ValidationError> {
        let handle = self.find_input(name)?;
        if handle.kind != value.kind() {
            return Err(ValidationError::InvalidValue {
                name: name.to_string(),
                kind: handle.kind,
                value: value.to_string(),
            });
        }
        self.inputs.set(handle, value);
        Ok(())
    }

    /// Parse `raw` according to the input's kind and assign it
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), ValidationError> {
        let handle = self.find_input(name)?;
        let decimal = self.active_format.decimal_char().unwrap_or(',');
        let value =
            Value::parse(handle.kind, raw, decimal).map_err(|_| ValidationError::InvalidValue {
                name: name.to_string(),
                kind: handle.kind,
                value: raw.to_string(),
            })?;
        self.inputs.set(handle, value);
        Ok(())
    }

    /// Remove the value of the input named `name`
    pub fn clear_input(&mut self, name: &str) -> Result<(), ValidationError> {
        let handle = self.find_input(name)?;
        self.inputs.clear(handle);
        Ok(())
    }

    fn find_input(&self, name: &str) -> Result<InputHandle, ValidationError> {
        self.inputs
            .find(name)
            .ok_or_else(|| ValidationError::UnknownInput {
                name: name.to_string(),
            })
    }

    // ==================== Rendering ====================

    pub fn render(&self, index: usize) -> Result<String, RenderError> {
        let template = self
            .templates
            .get(index)
            .ok_or(RenderError::MissingTemplate {
                index,
                count: self.templates.len(),
            })?;
        renderer::render(&template.tokens, &self.inputs, &self.active_format)
    }

    pub fn render_all(&self) -> Result<Vec<String>, RenderError> {
        (0..self.templates.len())
            .map(|index| self.render(index))
            .collect()
    }

    // ==================== Re-parse ====================

    fn reparse(&mut self) -> Result<(), ValidationError> {
        match self.parse_all() {
            Ok(reparsed) => {
                self.apply(reparsed);
                Ok(())
            }
            Err(err) => {
                warn!(
                    code = ?err.code(),
                    template = ?err.template(),
                    "re-parse rejected, keeping previous bindings"
                );
                self.state = NodeState::Stale;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn parse_all(&self) -> Result<Reparsed, ValidationError> {
        let mut session = ParseSession::for_format(&self.config.number_format)
            .map_err(ValidationError::Separator)?;

        let mut tokens = Vec::with_capacity(self.templates.len());
        for (index, template) in self.templates.iter().enumerate() {
            tokens.push(self.parse_template(index, &template.text, &mut session)?);
        }
        Ok(Reparsed {
            tokens,
            variables: session.into_variables(),
        })
    }

    fn parse_template(
        &self,
        index: usize,
        text: &str,
        session: &mut ParseSession,
    ) -> Result<Vec<Token>, ValidationError> {
        let policy = |code| ValidationError::Template {
            template: index,
            code,
        };
        let required = self.config.require_placeholders;

        if required && text.is_empty() {
            return Err(policy(ErrorCode::EmptyTemplate));
        }

        let segments = lexer::scan(text);
        if segments.len() > MAX_TEMPLATE_TOKENS {
            return Err(policy(ErrorCode::TooManyPlaceholders));
        }

        let mut tokens = Vec::with_capacity(segments.len());
        for segment in segments {
            let token = match segment {
                Segment::Text(text) => Token::ConstText(text.to_string()),
                Segment::Placeholder { body, span } => session.parse_placeholder(body, span),
            };
            if let Token::Error(error) = token {
                return Err(ValidationError::Placeholder {
                    template: index,
                    error,
                });
            }
            tokens.push(token);
        }

        let counts = session.counts();
        if let Some(kind) = VarKind::ALL
            .into_iter()
            .find(|kind| counts.get(*kind) > MAX_PLACEHOLDERS_PER_KIND)
        {
            return Err(policy(ErrorCode::too_many(kind)));
        }

        if required && !tokens.iter().any(Token::is_placeholder) {
            return Err(policy(ErrorCode::NoPlaceholder));
        }

        trace!(template = index, tokens = tokens.len(), "template parsed");
        Ok(tokens)
    }

    fn apply(&mut self, reparsed: Reparsed) {
        let counts = KindCounts::of(&reparsed.variables);
        self.inputs.resize(counts);

        let mut next = KindCounts::default();
        for variable in &reparsed.variables {
            let handle = InputHandle {
                kind: variable.kind,
                index: next.increment(variable.kind),
            };
            variable.bind(handle);
            self.inputs.set_name(handle, &variable.name);
            trace!(name = %variable.name, kind = %variable.kind, index = handle.index, "bound input");
        }

        for (template, tokens) in self.templates.iter_mut().zip(reparsed.tokens) {
            template.tokens = tokens;
        }
        self.variables = reparsed.variables;
        self.active_format = self.config.number_format.clone();
        self.state = NodeState::Idle;
        self.last_error = None;
        self.revision += 1;

        debug!(
            revision = self.revision,
            bools = counts.get(VarKind::Bool),
            ints = counts.get(VarKind::Int),
            reals = counts.get(VarKind::Real),
            texts = counts.get(VarKind::Str),
            "templates re-parsed"
        );
    }
}
