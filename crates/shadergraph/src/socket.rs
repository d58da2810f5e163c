// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket declarations for node inputs/outputs.

use crate::graph::GraphError;
use crate::value::{DataType, Value};
use std::fmt;

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

impl fmt::Display for SocketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// One named member of an enumeration domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    /// Display name
    pub name: String,
    /// Raw value stored in the socket
    pub value: i32,
}

/// A Rust enum usable as the domain of an enum socket.
///
/// Usually implemented through [`socket_enum!`](crate::socket_enum).
pub trait SocketEnum: Copy + 'static {
    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Snake-case name of the variant
    fn name(self) -> &'static str;

    /// Raw integer stored in a [`Value::Enum`]
    fn to_raw(self) -> i32;

    /// Look a variant up by its raw value
    fn from_raw(raw: i32) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.to_raw() == raw)
    }
}

/// Declare an enum and implement [`SocketEnum`] for it.
///
/// ```
/// shadergraph::socket_enum! {
///     /// Blend modes
///     pub enum Blend {
///         /// Plain mix
///         Mix = 0 => "mix",
///         /// Additive
///         Add = 1 => "add",
///     }
/// }
/// ```
#[macro_export]
macro_rules! socket_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $raw ),+
        }

        impl $crate::socket::SocketEnum for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn to_raw(self) -> i32 {
                self as i32
            }
        }
    };
}

/// A socket declared on a node prototype
#[derive(Debug, Clone)]
pub struct Socket {
    /// Socket name, unique within its input or output list
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Value used when an input is neither set nor linked
    pub default_value: Value,
    /// Lower bound hint for numeric sockets
    pub min: Option<f32>,
    /// Upper bound hint for numeric sockets
    pub max: Option<f32>,
    /// Allowed values for enum sockets
    pub enum_set: Option<Vec<EnumEntry>>,
}

impl Socket {
    /// Create a socket whose default is the zero value of its type
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default_value: Value::zero(data_type),
            min: None,
            max: None,
            enum_set: None,
        }
    }

    /// Create an enum socket whose domain is every variant of `E`
    pub fn enumeration<E: SocketEnum>(name: impl Into<String>, default: E) -> Self {
        let entries = E::VARIANTS
            .iter()
            .map(|v| EnumEntry {
                name: v.name().to_string(),
                value: v.to_raw(),
            })
            .collect();
        Self {
            enum_set: Some(entries),
            ..Self::new(name, DataType::Enum).with_default(Value::Enum(default.to_raw()))
        }
    }

    /// Set the default value.
    ///
    /// # Panics
    ///
    /// Panics if the value's type differs from the socket's; prototypes are
    /// built by code, so this is a programming error.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        assert_eq!(
            value.data_type(),
            self.data_type,
            "default for socket '{}' has the wrong type",
            self.name
        );
        self.default_value = value;
        self
    }

    /// Set the numeric range hint
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Check that a value may be stored in this socket
    pub fn check_value(&self, value: &Value) -> Result<(), GraphError> {
        if value.data_type() != self.data_type {
            return Err(GraphError::TypeMismatch {
                expected: self.data_type,
                found: value.data_type(),
            });
        }
        if let (Some(entries), Value::Enum(raw)) = (&self.enum_set, value) {
            if !entries.iter().any(|e| e.value == *raw) {
                return Err(GraphError::InvalidEnumValue {
                    socket: self.name.clone(),
                    value: *raw,
                });
            }
        }
        Ok(())
    }

    /// Name of an enum value in this socket's domain
    pub fn enum_name(&self, raw: i32) -> Option<&str> {
        self.enum_set
            .as_ref()?
            .iter()
            .find(|e| e.value == raw)
            .map(|e| e.name.as_str())
    }
}

/// Addresses a socket either by position or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKey<'a> {
    /// Position in the prototype's socket list
    Index(usize),
    /// Socket name
    Name(&'a str),
}

impl<'a> SocketKey<'a> {
    /// Resolve against a socket list
    pub fn resolve(self, sockets: &[Socket]) -> Option<usize> {
        match self {
            Self::Index(i) => (i < sockets.len()).then_some(i),
            Self::Name(name) => sockets.iter().position(|s| s.name == name),
        }
    }
}

impl From<usize> for SocketKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for SocketKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for SocketKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for SocketKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::socket_enum! {
        enum Mode {
            First = 0 => "first",
            Second = 5 => "second",
        }
    }

    #[test]
    fn test_enum_socket_domain() {
        let socket = Socket::enumeration("mode", Mode::Second);
        assert_eq!(socket.data_type, DataType::Enum);
        assert_eq!(socket.default_value, Value::Enum(5));
        assert_eq!(socket.enum_name(0), Some("first"));
        assert!(socket.check_value(&Value::Enum(5)).is_ok());
        assert!(matches!(
            socket.check_value(&Value::Enum(2)),
            Err(GraphError::InvalidEnumValue { value: 2, .. })
        ));
        assert_eq!(Mode::from_raw(5), Some(Mode::Second));
        assert_eq!(Mode::from_raw(1), None);
    }

    #[test]
    fn test_check_value_type() {
        let socket = Socket::new("fac", DataType::Float).with_default(0.5f32);
        assert!(socket.check_value(&Value::Float(1.0)).is_ok());
        assert!(matches!(
            socket.check_value(&Value::Boolean(true)),
            Err(GraphError::TypeMismatch {
                expected: DataType::Float,
                found: DataType::Boolean
            })
        ));
    }

    #[test]
    fn test_socket_key_resolve() {
        let sockets = vec![
            Socket::new("a", DataType::Float),
            Socket::new("b", DataType::Color),
        ];
        assert_eq!(SocketKey::from("b").resolve(&sockets), Some(1));
        assert_eq!(SocketKey::from(1usize).resolve(&sockets), Some(1));
        assert_eq!(SocketKey::from(2usize).resolve(&sockets), None);
        assert_eq!(SocketKey::from("c").resolve(&sockets), None);
    }

    #[test]
    #[should_panic(expected = "wrong type")]
    fn test_default_type_checked() {
        let _ = Socket::new("x", DataType::Float).with_default(true);
    }
}
