// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector math producing either a scalar or a vector result.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "vector_math";
/// Operation selector
pub const IN_OPERATION: &str = "operation";
/// First operand
pub const IN_VECTOR1: &str = "vector1";
/// Second operand
pub const IN_VECTOR2: &str = "vector2";
/// Third operand
pub const IN_VECTOR3: &str = "vector3";
/// Scale factor for [`Operation::Scale`], refraction index for [`Operation::Refract`]
pub const IN_SCALE: &str = "scale";
/// Scalar result (dot product, distance, length)
pub const OUT_VALUE: &str = "value";
/// Vector result
pub const OUT_VECTOR: &str = "vector";

crate::socket_enum! {
    /// Vector operation
    pub enum Operation {
        /// a + b
        Add = 0 => "add",
        /// a - b
        Subtract = 1 => "subtract",
        /// a * b
        Multiply = 2 => "multiply",
        /// a / b
        Divide = 3 => "divide",
        /// cross(a, b)
        CrossProduct = 4 => "cross_product",
        /// a projected onto b
        Project = 5 => "project",
        /// reflect(a, b)
        Reflect = 6 => "reflect",
        /// dot(a, b)
        DotProduct = 7 => "dot_product",
        /// distance(a, b)
        Distance = 8 => "distance",
        /// length(a)
        Length = 9 => "length",
        /// a * scale
        Scale = 10 => "scale",
        /// normalize(a)
        Normalize = 11 => "normalize",
        /// a snapped down to multiples of b
        Snap = 12 => "snap",
        /// floor(a)
        Floor = 13 => "floor",
        /// ceil(a)
        Ceil = 14 => "ceil",
        /// mod(a, b)
        Modulo = 15 => "modulo",
        /// fract(a)
        Fraction = 16 => "fraction",
        /// abs(a)
        Absolute = 17 => "absolute",
        /// min(a, b)
        Minimum = 18 => "minimum",
        /// max(a, b)
        Maximum = 19 => "maximum",
        /// a wrapped into [c, b)
        Wrap = 20 => "wrap",
        /// sin(a)
        Sine = 21 => "sine",
        /// cos(a)
        Cosine = 22 => "cosine",
        /// tan(a)
        Tangent = 23 => "tangent",
        /// refract(a, b, scale)
        Refract = 24 => "refract",
        /// faceforward(a, b, c)
        FaceForward = 25 => "faceforward",
        /// a * b + c
        MultiplyAdd = 26 => "multiply_add",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Math, evaluate)
        .with_input(Socket::enumeration(IN_OPERATION, Operation::Add))
        .with_input(Socket::new(IN_VECTOR1, DataType::Vector))
        .with_input(Socket::new(IN_VECTOR2, DataType::Vector))
        .with_input(Socket::new(IN_VECTOR3, DataType::Vector))
        .with_input(Socket::new(IN_SCALE, DataType::Float).with_default(1.0f32))
        .with_output(Socket::new(OUT_VALUE, DataType::Float))
        .with_output(Socket::new(OUT_VECTOR, DataType::Vector))
        .with_module("math")
}

enum Outcome {
    Scalar(String),
    Vector(String),
}

fn expression(op: Operation, a: &str, b: &str, c: &str, scale: &str) -> Outcome {
    use Outcome::{Scalar, Vector};
    match op {
        Operation::Add => Vector(format!("{a} + {b}")),
        Operation::Subtract => Vector(format!("{a} - {b}")),
        Operation::Multiply => Vector(format!("{a} * {b}")),
        Operation::Divide => Vector(format!("{a} / {b}")),
        Operation::CrossProduct => Vector(format!("cross({a}, {b})")),
        Operation::Project => Vector(format!("project({a}, {b})")),
        Operation::Reflect => Vector(format!("reflect({a}, {b})")),
        Operation::DotProduct => Scalar(format!("dot({a}, {b})")),
        Operation::Distance => Scalar(format!("distance({a}, {b})")),
        Operation::Length => Scalar(format!("length({a})")),
        Operation::Scale => Vector(format!("{a} * {scale}")),
        Operation::Normalize => Vector(format!("normalize({a})")),
        Operation::Snap => Vector(format!("floor({a} / {b}) * {b}")),
        Operation::Floor => Vector(format!("floor({a})")),
        Operation::Ceil => Vector(format!("ceil({a})")),
        Operation::Modulo => Vector(format!("mod({a}, {b})")),
        Operation::Fraction => Vector(format!("fract({a})")),
        Operation::Absolute => Vector(format!("abs({a})")),
        Operation::Minimum => Vector(format!("min({a}, {b})")),
        Operation::Maximum => Vector(format!("max({a}, {b})")),
        Operation::Wrap => Vector(format!("wrap({a}, {b}, {c})")),
        Operation::Sine => Vector(format!("sin({a})")),
        Operation::Cosine => Vector(format!("cos({a})")),
        Operation::Tangent => Vector(format!("tan({a})")),
        Operation::Refract => Vector(format!("refract({a}, normalize({b}), {scale})")),
        Operation::FaceForward => Vector(format!("faceforward({a}, {b}, {c})")),
        Operation::MultiplyAdd => Vector(format!("{a} * {b} + {c}")),
    }
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let op: Operation = e.constant_enum(IN_OPERATION)?;
    let a = e.input(IN_VECTOR1)?;
    let b = e.input(IN_VECTOR2)?;
    let c = e.input(IN_VECTOR3)?;
    let scale = e.input(IN_SCALE)?;

    let (scalar, vector) = match expression(op, &a, &b, &c, &scale) {
        Outcome::Scalar(expr) => (expr, "vec3(0.0)".to_string()),
        Outcome::Vector(expr) => ("0.0".to_string(), expr),
    };
    Ok(format!(
        "{} = {scalar};\n{} = {vector};\n",
        e.output_declaration(OUT_VALUE)?,
        e.output_declaration(OUT_VECTOR)?
    ))
}
