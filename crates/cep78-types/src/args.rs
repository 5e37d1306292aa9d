//! Named call arguments.

use crate::bytesrepr::{self, write_string, write_u32, Reader};
use crate::cl_type::ClType;
use crate::errors::DecodeError;
use crate::value::ClValue;

/// A name bound to one typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArg {
    /// Argument name, unique within a [`RuntimeArgs`].
    pub name: String,
    /// Bound value.
    pub value: ClValue,
}

impl NamedArg {
    /// Creates a named argument.
    pub fn new(name: impl Into<String>, value: impl Into<ClValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Declared type of the bound value.
    pub fn cl_type(&self) -> ClType {
        self.value.cl_type()
    }
}

/// Ordered argument collection with unique names.
///
/// Inserting an existing name replaces its value in place, so the first
/// insertion fixes the position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeArgs {
    args: Vec<NamedArg>,
}

impl RuntimeArgs {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ClValue>) {
        let arg = NamedArg::new(name, value);
        match self.args.iter_mut().find(|existing| existing.name == arg.name) {
            Some(existing) => existing.value = arg.value,
            None => self.args.push(arg),
        }
    }

    /// Inserts `value` under `name` only when present.
    pub fn insert_opt<V: Into<ClValue>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&ClValue> {
        self.args
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    /// Argument names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.name.as_str())
    }

    /// Arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamedArg> {
        self.args.iter()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when no argument is set.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Serializes as a `u32` count followed by `name, value envelope` pairs.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_u32(self.args.len() as u32, &mut out);
        for arg in &self.args {
            write_string(&arg.name, &mut out);
            out.extend_from_slice(&bytesrepr::to_tagged_bytes(&arg.value));
        }
        out
    }

    /// Parses the layout written by [`RuntimeArgs::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<(RuntimeArgs, &[u8]), DecodeError> {
        let mut reader = Reader::new(bytes);
        let count = reader.u32()?;
        let mut rest = reader.into_remainder();
        let mut args = RuntimeArgs::new();
        for _ in 0..count {
            let mut reader = Reader::new(rest);
            let name = reader.string()?;
            let (value, remainder) = bytesrepr::from_tagged_bytes(reader.into_remainder(), &ClType::Any)?;
            args.insert(name, value);
            rest = remainder;
        }
        Ok((args, rest))
    }
}

impl<'a> IntoIterator for &'a RuntimeArgs {
    type Item = &'a NamedArg;
    type IntoIter = std::slice::Iter<'a, NamedArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut args = RuntimeArgs::new();
        args.insert("a", 1u8);
        args.insert("b", 2u8);
        args.insert("a", 3u8);
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(args.get("a"), Some(&ClValue::U8(3)));
    }

    #[test]
    fn optional_insert_skips_none() {
        let mut args = RuntimeArgs::new();
        args.insert_opt::<bool>("allow_minting", None);
        args.insert_opt("burn_mode", Some(1u8));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["burn_mode"]);
    }

    #[test]
    fn serialized_layout() {
        let mut args = RuntimeArgs::new();
        args.insert("id", 7u64);
        assert_eq!(
            args.to_bytes(),
            vec![
                1, 0, 0, 0, // count
                2, 0, 0, 0, b'i', b'd', // name
                8, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, // value bytes
                5, // U64
            ]
        );
    }

    #[test]
    fn parse_back_preserves_order() {
        let mut args = RuntimeArgs::new();
        args.insert("z", "last");
        args.insert("a", true);
        let bytes = args.to_bytes();
        let (parsed, rest) = RuntimeArgs::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, args);
        assert!(rest.is_empty());
    }
}
