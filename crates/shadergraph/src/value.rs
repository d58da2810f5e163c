// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data types carried by sockets and the values stored in them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of data that can flow through a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean value
    Boolean,
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Floating point value
    Float,
    /// Integer drawn from a named enumeration
    Enum,
    /// String value (identifiers, names)
    String,
    /// RGB color
    Color,
    /// 3D direction vector
    Vector,
    /// 3D position
    Point,
    /// 3D surface normal
    Normal,
    /// 2D point / texture coordinate
    Point2,
    /// 4D vector
    Vector4,
    /// 4x4 matrix
    Transform,
}

impl DataType {
    /// All data types, in declaration order
    pub const ALL: [DataType; 13] = [
        Self::Boolean,
        Self::Int,
        Self::UInt,
        Self::Float,
        Self::Enum,
        Self::String,
        Self::Color,
        Self::Vector,
        Self::Point,
        Self::Normal,
        Self::Point2,
        Self::Vector4,
        Self::Transform,
    ];

    /// Lowercase name of the type
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Enum => "enum",
            Self::String => "string",
            Self::Color => "color",
            Self::Vector => "vector",
            Self::Point => "point",
            Self::Normal => "normal",
            Self::Point2 => "point2",
            Self::Vector4 => "vector4",
            Self::Transform => "transform",
        }
    }

    /// GLSL type used to declare a variable of this kind.
    ///
    /// Strings have no GLSL representation.
    pub fn glsl_type(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("bool"),
            Self::Int | Self::Enum => Some("int"),
            Self::UInt => Some("uint"),
            Self::Float => Some("float"),
            Self::String => None,
            Self::Color | Self::Vector | Self::Point | Self::Normal => Some("vec3"),
            Self::Point2 => Some("vec2"),
            Self::Vector4 => Some("vec4"),
            Self::Transform => Some("mat4"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete value of one [`DataType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Boolean(bool),
    /// Signed integer
    Int(i32),
    /// Unsigned integer
    UInt(u32),
    /// Float
    Float(f32),
    /// Raw enumeration value
    Enum(i32),
    /// String
    String(String),
    /// RGB color
    Color([f32; 3]),
    /// Direction vector
    Vector([f32; 3]),
    /// Position
    Point([f32; 3]),
    /// Surface normal
    Normal([f32; 3]),
    /// 2D point
    Point2([f32; 2]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Column-major 4x4 matrix
    Transform([f32; 16]),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Int(_) => DataType::Int,
            Self::UInt(_) => DataType::UInt,
            Self::Float(_) => DataType::Float,
            Self::Enum(_) => DataType::Enum,
            Self::String(_) => DataType::String,
            Self::Color(_) => DataType::Color,
            Self::Vector(_) => DataType::Vector,
            Self::Point(_) => DataType::Point,
            Self::Normal(_) => DataType::Normal,
            Self::Point2(_) => DataType::Point2,
            Self::Vector4(_) => DataType::Vector4,
            Self::Transform(_) => DataType::Transform,
        }
    }

    /// The zero value of a data type (identity matrix for transforms)
    pub fn zero(data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Boolean(false),
            DataType::Int => Self::Int(0),
            DataType::UInt => Self::UInt(0),
            DataType::Float => Self::Float(0.0),
            DataType::Enum => Self::Enum(0),
            DataType::String => Self::String(String::new()),
            DataType::Color => Self::Color([0.0; 3]),
            DataType::Vector => Self::Vector([0.0; 3]),
            DataType::Point => Self::Point([0.0; 3]),
            DataType::Normal => Self::Normal([0.0; 3]),
            DataType::Point2 => Self::Point2([0.0; 2]),
            DataType::Vector4 => Self::Vector4([0.0; 4]),
            DataType::Transform => {
                let mut m = [0.0; 16];
                for i in 0..4 {
                    m[i * 5] = 1.0;
                }
                Self::Transform(m)
            }
        }
    }

    /// Render this value as a GLSL literal.
    ///
    /// Returns `None` for strings and non-finite floats, which have no literal form.
    pub fn to_glsl(&self) -> Option<String> {
        match self {
            Self::Boolean(v) => Some(v.to_string()),
            Self::Int(v) | Self::Enum(v) => Some(v.to_string()),
            Self::UInt(v) => Some(format!("{v}u")),
            Self::Float(v) => glsl_float(*v),
            Self::String(_) => None,
            Self::Color(v) | Self::Vector(v) | Self::Point(v) | Self::Normal(v) => {
                glsl_constructor("vec3", v)
            }
            Self::Point2(v) => glsl_constructor("vec2", v),
            Self::Vector4(v) => glsl_constructor("vec4", v),
            Self::Transform(v) => glsl_constructor("mat4", v),
        }
    }
}

fn glsl_float(v: f32) -> Option<String> {
    if !v.is_finite() {
        return None;
    }
    let text = v.to_string();
    if text.contains('.') {
        Some(text)
    } else {
        Some(format!("{text}.0"))
    }
}

fn glsl_constructor(ty: &str, components: &[f32]) -> Option<String> {
    let parts = components
        .iter()
        .map(|c| glsl_float(*c))
        .collect::<Option<Vec<_>>>()?;
    Some(format!("{ty}({})", parts.join(", ")))
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Typed extraction of a native value out of a [`Value`]
pub trait FromValue: Sized {
    /// Extract the native value, or `None` if the variant does not match
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) | Value::Enum(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for [f32; 3] {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Color(v) | Value::Vector(v) | Value::Point(v) | Value::Normal(v) => Some(*v),
            _ => None,
        }
    }
}
