//! Typed input slots the node generates for placeholder variables

use std::fmt;

use crate::parser::ast::{InputHandle, VarKind};
use crate::parser::number::{parse_integer, parse_number, NumberError};
use crate::parser::session::KindCounts;

/// A value held by an input
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> VarKind {
        match self {
            Value::Bool(_) => VarKind::Bool,
            Value::Int(_) => VarKind::Int,
            Value::Real(_) => VarKind::Real,
            Value::Text(_) => VarKind::Str,
        }
    }

    /// Read raw text as a value of `kind`
    ///
    /// Booleans accept `true`/`false`/`1`/`0` (any case); reals use
    /// `decimal` as their decimal separator.
    pub fn parse(kind: VarKind, raw: &str, decimal: char) -> Result<Self, NumberError> {
        match kind {
            VarKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                "" => Err(NumberError::Empty),
                _ => Err(NumberError::Malformed),
            },
            VarKind::Int => parse_integer(raw).map(Value::Int),
            VarKind::Real => parse_number(raw, decimal).map(Value::Real),
            VarKind::Str => Ok(Value::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One input: a display name and an optional value
#[derive(Debug, Clone, PartialEq)]
pub struct Input<T> {
    name: String,
    value: Option<T>,
}

impl<T> Input<T> {
    fn fresh() -> Self {
        Self {
            name: String::new(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Index-addressed inputs of one type.
///
/// Resizing keeps every surviving slot, value included; only the tail is
/// dropped or extended.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSlots<T> {
    slots: Vec<Input<T>>,
}

impl<T> Default for InputSlots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> InputSlots<T> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn resize(&mut self, len: usize) {
        if len < self.slots.len() {
            self.slots.truncate(len);
        } else {
            self.slots.resize_with(len, Input::fresh);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Input<T>> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Input<T>> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Input<T>> {
        self.slots.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|input| input.name == name)
    }
}

/// The four per-kind input collections of one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBank {
    pub bools: InputSlots<bool>,
    pub ints: InputSlots<i64>,
    pub reals: InputSlots<f64>,
    pub texts: InputSlots<String>,
}

impl InputBank {
    pub fn counts(&self) -> KindCounts {
        KindCounts::new(
            self.bools.len(),
            self.ints.len(),
            self.reals.len(),
            self.texts.len(),
        )
    }

    /// Grow or shrink every collection to the given per-kind counts
    pub fn resize(&mut self, counts: KindCounts) {
        self.bools.resize(counts.get(VarKind::Bool));
        self.ints.resize(counts.get(VarKind::Int));
        self.reals.resize(counts.get(VarKind::Real));
        self.texts.resize(counts.get(VarKind::Str));
    }

    /// Current value behind a handle, if the slot exists and is set
    pub fn value(&self, handle: InputHandle) -> Option<Value> {
        match handle.kind {
            VarKind::Bool => self.bools.get(handle.index)?.value().copied().map(Value::Bool),
            VarKind::Int => self.ints.get(handle.index)?.value().copied().map(Value::Int),
            VarKind::Real => self.reals.get(handle.index)?.value().copied().map(Value::Real),
            VarKind::Str => self
                .texts
                .get(handle.index)?
                .value()
                .cloned()
                .map(Value::Text),
        }
    }

    /// Store a value; returns false if the slot is missing or of another kind
    pub fn set(&mut self, handle: InputHandle, value: Value) -> bool {
        match (value, handle.kind) {
            (Value::Bool(v), VarKind::Bool) => set_slot(&mut self.bools, handle.index, v),
            (Value::Int(v), VarKind::Int) => set_slot(&mut self.ints, handle.index, v),
            (Value::Real(v), VarKind::Real) => set_slot(&mut self.reals, handle.index, v),
            (Value::Text(v), VarKind::Str) => set_slot(&mut self.texts, handle.index, v),
            _ => false,
        }
    }

    /// Remove the value behind a handle
    pub fn clear(&mut self, handle: InputHandle) {
        match handle.kind {
            VarKind::Bool => clear_slot(&mut self.bools, handle.index),
            VarKind::Int => clear_slot(&mut self.ints, handle.index),
            VarKind::Real => clear_slot(&mut self.reals, handle.index),
            VarKind::Str => clear_slot(&mut self.texts, handle.index),
        }
    }

    pub fn name(&self, handle: InputHandle) -> Option<&str> {
        match handle.kind {
            VarKind::Bool => self.bools.get(handle.index).map(Input::name),
            VarKind::Int => self.ints.get(handle.index).map(Input::name),
            VarKind::Real => self.reals.get(handle.index).map(Input::name),
            VarKind::Str => self.texts.get(handle.index).map(Input::name),
        }
    }

    pub(crate) fn set_name(&mut self, handle: InputHandle, name: &str) {
        let slot_name = match handle.kind {
            VarKind::Bool => self.bools.get_mut(handle.index).map(|i| &mut i.name),
            VarKind::Int => self.ints.get_mut(handle.index).map(|i| &mut i.name),
            VarKind::Real => self.reals.get_mut(handle.index).map(|i| &mut i.name),
            VarKind::Str => self.texts.get_mut(handle.index).map(|i| &mut i.name),
        };
        if let Some(slot_name) = slot_name {
            name.clone_into(slot_name);
        }
    }

    /// Find an input by its display name
    pub fn find(&self, name: &str) -> Option<InputHandle> {
        VarKind::ALL.into_iter().find_map(|kind| {
            let index = match kind {
                VarKind::Bool => self.bools.position(name),
                VarKind::Int => self.ints.position(name),
                VarKind::Real => self.reals.position(name),
                VarKind::Str => self.texts.position(name),
            }?;
            Some(InputHandle { kind, index })
        })
    }

    /// Every input handle, grouped by kind
    pub fn handles(&self) -> impl Iterator<Item = InputHandle> + '_ {
        let counts = self.counts();
        VarKind::ALL.into_iter().flat_map(move |kind| {
            (0..counts.get(kind)).map(move |index| InputHandle { kind, index })
        })
    }
}

fn set_slot<T>(slots: &mut InputSlots<T>, index: usize, value: T) -> bool {
    match slots.get_mut(index) {
        Some(input) => {
            input.set(value);
            true
        }
        None => false,
    }
}

fn clear_slot<T>(slots: &mut InputSlots<T>, index: usize) {
    if let Some(input) = slots.get_mut(index) {
        input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(kind: VarKind, index: usize) -> InputHandle {
        InputHandle { kind, index }
    }

    #[test]
    fn test_resize_keeps_surviving_values() {
        let mut slots = InputSlots::<i64>::default();
        slots.resize(3);
        slots.get_mut(0).unwrap().set(10);
        slots.get_mut(2).unwrap().set(30);

        slots.resize(2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(0).unwrap().value(), Some(&10));

        slots.resize(4);
        assert_eq!(slots.get(0).unwrap().value(), Some(&10));
        assert!(!slots.get(2).unwrap().has_value());
        assert!(!slots.get(3).unwrap().has_value());
    }

    #[test]
    fn test_bank_set_and_value() {
        let mut bank = InputBank::default();
        bank.resize(KindCounts::new(1, 1, 1, 1));

        assert!(bank.set(handle(VarKind::Bool, 0), Value::Bool(true)));
        assert!(bank.set(handle(VarKind::Str, 0), Value::Text("hi".into())));
        assert!(!bank.set(handle(VarKind::Int, 0), Value::Real(1.0)));
        assert!(!bank.set(handle(VarKind::Int, 5), Value::Int(1)));

        assert_eq!(bank.value(handle(VarKind::Bool, 0)), Some(Value::Bool(true)));
        assert_eq!(bank.value(handle(VarKind::Int, 0)), None);
        assert_eq!(bank.value(handle(VarKind::Real, 9)), None);

        bank.clear(handle(VarKind::Bool, 0));
        assert_eq!(bank.value(handle(VarKind::Bool, 0)), None);
    }

    #[test]
    fn test_find_by_name() {
        let mut bank = InputBank::default();
        bank.resize(KindCounts::new(0, 2, 0, 0));
        bank.set_name(handle(VarKind::Int, 1), "count");
        assert_eq!(bank.find("count"), Some(handle(VarKind::Int, 1)));
        assert_eq!(bank.name(handle(VarKind::Int, 1)), Some("count"));
        assert_eq!(bank.find("missing"), None);
    }

    #[test]
    fn test_handles_in_kind_order() {
        let mut bank = InputBank::default();
        bank.resize(KindCounts::new(1, 0, 2, 0));
        let handles: Vec<_> = bank.handles().collect();
        assert_eq!(
            handles,
            vec![
                handle(VarKind::Bool, 0),
                handle(VarKind::Real, 0),
                handle(VarKind::Real, 1)
            ]
        );
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(Value::parse(VarKind::Bool, "TRUE", ','), Ok(Value::Bool(true)));
        assert_eq!(Value::parse(VarKind::Bool, "0", ','), Ok(Value::Bool(false)));
        assert_eq!(
            Value::parse(VarKind::Bool, "yes", ','),
            Err(NumberError::Malformed)
        );
        assert_eq!(Value::parse(VarKind::Int, "42", ','), Ok(Value::Int(42)));
        assert_eq!(Value::parse(VarKind::Real, "3,14", ','), Ok(Value::Real(3.14)));
        assert_eq!(
            Value::parse(VarKind::Str, " raw ", ','),
            Ok(Value::Text(" raw ".into()))
        );
    }
}
