//! Parameters exchanged through the push/peek/pop operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag carried by every parameter on the wire.
///
/// The far side checks that the tag a caller pops with matches the tag of
/// the pending parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ParamKind {
    /// Variable-length byte sequence (strings and raw buffers)
    Array = 0,
    /// Single 64-bit scalar
    Primitive = 1,
}

impl ParamKind {
    /// Wire value of this tag.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Decodes a wire tag.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ParamKind::Array),
            1 => Some(ParamKind::Primitive),
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Array => write!(f, "array"),
            ParamKind::Primitive => write!(f, "primitive"),
        }
    }
}

/// An owned parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameter {
    /// A single scalar
    Primitive(i64),
    /// A byte sequence; its length is the wire size
    Array(Vec<u8>),
}

impl Parameter {
    /// Creates an array parameter from UTF-8 text (no terminator).
    pub fn string(text: &str) -> Self {
        Parameter::Array(text.as_bytes().to_vec())
    }

    /// Returns the wire tag.
    pub fn kind(&self) -> ParamKind {
        match self {
            Parameter::Primitive(_) => ParamKind::Primitive,
            Parameter::Array(_) => ParamKind::Array,
        }
    }

    /// Returns the header a peek would report for this parameter.
    pub fn header(&self) -> ParamHeader {
        self.view().header()
    }

    /// Borrows this parameter for a push.
    pub fn view(&self) -> ParamRef<'_> {
        match self {
            Parameter::Primitive(value) => ParamRef::Primitive(*value),
            Parameter::Array(bytes) => ParamRef::Array(bytes),
        }
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Primitive(value)
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(bytes: Vec<u8>) -> Self {
        Parameter::Array(bytes)
    }
}

impl From<&str> for Parameter {
    fn from(text: &str) -> Self {
        Parameter::string(text)
    }
}

/// A borrowed parameter, as handed to the boundary on push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRef<'a> {
    Primitive(i64),
    Array(&'a [u8]),
}

impl<'a> ParamRef<'a> {
    /// Returns the wire tag.
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamRef::Primitive(_) => ParamKind::Primitive,
            ParamRef::Array(_) => ParamKind::Array,
        }
    }

    /// Returns the tag and size of this parameter.
    pub fn header(&self) -> ParamHeader {
        match self {
            ParamRef::Primitive(_) => ParamHeader::primitive(),
            ParamRef::Array(bytes) => ParamHeader::array(bytes.len()),
        }
    }

    /// Copies the borrowed value into an owned parameter.
    pub fn to_parameter(&self) -> Parameter {
        match self {
            ParamRef::Primitive(value) => Parameter::Primitive(*value),
            ParamRef::Array(bytes) => Parameter::Array(bytes.to_vec()),
        }
    }
}

/// Tag and size of the next pending parameter, filled in by a peek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamHeader {
    pub kind: ParamKind,
    /// Byte length for arrays; zero for primitives
    pub size: usize,
}

impl ParamHeader {
    pub const fn primitive() -> Self {
        Self {
            kind: ParamKind::Primitive,
            size: 0,
        }
    }

    pub const fn array(size: usize) -> Self {
        Self {
            kind: ParamKind::Array,
            size,
        }
    }
}

impl Default for ParamHeader {
    fn default() -> Self {
        Self::array(0)
    }
}

/// Destination of a destructive pop.
///
/// The tag of the slot is the tag the caller expects. For arrays the slice
/// length is the declared capacity; it must be at least the peeked size.
#[derive(Debug)]
pub enum PopSlot<'a> {
    Primitive(&'a mut i64),
    Array(&'a mut [u8]),
}

impl<'a> PopSlot<'a> {
    /// Returns the tag the caller expects.
    pub fn kind(&self) -> ParamKind {
        match self {
            PopSlot::Primitive(_) => ParamKind::Primitive,
            PopSlot::Array(_) => ParamKind::Array,
        }
    }

    /// Returns the declared capacity of an array slot.
    pub fn capacity(&self) -> usize {
        match self {
            PopSlot::Primitive(_) => 0,
            PopSlot::Array(buffer) => buffer.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_parameter_has_no_terminator() {
        let param = Parameter::string("vfs");
        assert_eq!(param.header(), ParamHeader::array(3));
        assert_eq!(param, Parameter::Array(b"vfs".to_vec()));
    }

    #[test]
    fn test_primitive_header_has_zero_size() {
        let param = Parameter::from(-9);
        assert_eq!(param.kind(), ParamKind::Primitive);
        assert_eq!(param.header(), ParamHeader::primitive());
    }

    #[test]
    fn test_param_ref_round_trips_to_owned() {
        let param = Parameter::Array(vec![0, 1, 2, 255]);
        assert_eq!(param.view().to_parameter(), param);
    }

    #[test]
    fn test_param_kind_raw_values() {
        assert_eq!(ParamKind::from_raw(0), Some(ParamKind::Array));
        assert_eq!(ParamKind::from_raw(1), Some(ParamKind::Primitive));
        assert_eq!(ParamKind::from_raw(2), None);
    }

    #[test]
    fn test_pop_slot_capacity() {
        let mut buffer = [0u8; 5];
        let slot = PopSlot::Array(&mut buffer);
        assert_eq!(slot.kind(), ParamKind::Array);
        assert_eq!(slot.capacity(), 5);

        let mut value = 0;
        let slot = PopSlot::Primitive(&mut value);
        assert_eq!(slot.kind(), ParamKind::Primitive);
        assert_eq!(slot.capacity(), 0);
    }
}
