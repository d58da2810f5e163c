// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scalar math on up to three float operands.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::nodes::clamp_statement;
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "math";
/// Operation selector
pub const IN_OPERATION: &str = "operation";
/// Clamp the result to [0, 1]
pub const IN_CLAMP: &str = "clamp";
/// First operand
pub const IN_VALUE1: &str = "value1";
/// Second operand
pub const IN_VALUE2: &str = "value2";
/// Third operand
pub const IN_VALUE3: &str = "value3";
/// Result
pub const OUT_VALUE: &str = "value";

crate::socket_enum! {
    /// Scalar operation
    pub enum Operation {
        /// a + b
        Add = 0 => "add",
        /// a - b
        Subtract = 1 => "subtract",
        /// a * b
        Multiply = 2 => "multiply",
        /// a / b
        Divide = 3 => "divide",
        /// a * b + c
        MultiplyAdd = 4 => "multiply_add",
        /// sin(a)
        Sine = 5 => "sine",
        /// cos(a)
        Cosine = 6 => "cosine",
        /// tan(a)
        Tangent = 7 => "tangent",
        /// sinh(a)
        SinH = 8 => "sinh",
        /// cosh(a)
        CosH = 9 => "cosh",
        /// tanh(a)
        TanH = 10 => "tanh",
        /// asin(a)
        ArcSine = 11 => "arcsine",
        /// acos(a)
        ArcCosine = 12 => "arccosine",
        /// atan(a)
        ArcTangent = 13 => "arctangent",
        /// pow(a, b)
        Power = 14 => "power",
        /// log(a)
        Logarithm = 15 => "logarithm",
        /// min(a, b)
        Minimum = 16 => "minimum",
        /// max(a, b)
        Maximum = 17 => "maximum",
        /// round(a)
        Round = 18 => "round",
        /// 1 if a < b
        LessThan = 19 => "less_than",
        /// 1 if a > b
        GreaterThan = 20 => "greater_than",
        /// mod(a, b)
        Modulo = 21 => "modulo",
        /// Modulo with the sign of b
        FlooredModulo = 22 => "floored_modulo",
        /// abs(a)
        Absolute = 23 => "absolute",
        /// atan(a, b)
        ArcTan2 = 24 => "arctan2",
        /// floor(a)
        Floor = 25 => "floor",
        /// ceil(a)
        Ceil = 26 => "ceil",
        /// fract(a)
        Fraction = 27 => "fraction",
        /// trunc(a)
        Trunc = 28 => "trunc",
        /// a snapped down to a multiple of b
        Snap = 29 => "snap",
        /// a wrapped into [c, b)
        Wrap = 30 => "wrap",
        /// a bounced back and forth over [0, b]
        PingPong = 31 => "pingpong",
        /// sqrt(a)
        Sqrt = 32 => "sqrt",
        /// inversesqrt(a)
        InverseSqrt = 33 => "inverse_sqrt",
        /// sign(a)
        Sign = 34 => "sign",
        /// exp(a)
        Exponent = 35 => "exponent",
        /// radians(a)
        Radians = 36 => "radians",
        /// degrees(a)
        Degrees = 37 => "degrees",
        /// Smooth minimum with distance c
        SmoothMin = 38 => "smooth_min",
        /// Smooth maximum with distance c
        SmoothMax = 39 => "smooth_max",
        /// 1 if a and b are within c of each other
        Compare = 40 => "compare",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Math, evaluate)
        .with_input(Socket::enumeration(IN_OPERATION, Operation::Add))
        .with_input(Socket::new(IN_CLAMP, DataType::Boolean))
        .with_input(Socket::new(IN_VALUE1, DataType::Float).with_default(0.5f32))
        .with_input(Socket::new(IN_VALUE2, DataType::Float).with_default(0.5f32))
        .with_input(Socket::new(IN_VALUE3, DataType::Float))
        .with_output(Socket::new(OUT_VALUE, DataType::Float))
        .with_module("math")
}

fn expression(op: Operation, a: &str, b: &str, c: &str) -> String {
    match op {
        Operation::Add => format!("{a} + {b}"),
        Operation::Subtract => format!("{a} - {b}"),
        Operation::Multiply => format!("{a} * {b}"),
        Operation::Divide => format!("{a} / {b}"),
        Operation::MultiplyAdd => format!("{a} * {b} + {c}"),
        Operation::Sine => format!("sin({a})"),
        Operation::Cosine => format!("cos({a})"),
        Operation::Tangent => format!("tan({a})"),
        Operation::SinH => format!("sinh({a})"),
        Operation::CosH => format!("cosh({a})"),
        Operation::TanH => format!("tanh({a})"),
        Operation::ArcSine => format!("asin({a})"),
        Operation::ArcCosine => format!("acos({a})"),
        Operation::ArcTangent => format!("atan({a})"),
        Operation::Power => format!("pow({a}, {b})"),
        Operation::Logarithm => format!("log({a})"),
        Operation::Minimum => format!("min({a}, {b})"),
        Operation::Maximum => format!("max({a}, {b})"),
        Operation::Round => format!("round({a})"),
        Operation::LessThan => format!("max(sign({b} - {a}), 0.0)"),
        Operation::GreaterThan => format!("max(sign({a} - {b}), 0.0)"),
        Operation::Modulo => format!("mod({a}, {b})"),
        Operation::FlooredModulo => format!("floored_modulo({a}, {b})"),
        Operation::Absolute => format!("abs({a})"),
        Operation::ArcTan2 => format!("atan({a}, {b})"),
        Operation::Floor => format!("floor({a})"),
        Operation::Ceil => format!("ceil({a})"),
        Operation::Fraction => format!("fract({a})"),
        Operation::Trunc => format!("trunc({a})"),
        Operation::Snap => format!("floor({a} / {b}) * {b}"),
        Operation::Wrap => format!("wrap({a}, {b}, {c})"),
        Operation::PingPong => format!("pingpong({a}, {b})"),
        Operation::Sqrt => format!("sqrt({a})"),
        Operation::InverseSqrt => format!("inversesqrt({a})"),
        Operation::Sign => format!("sign({a})"),
        Operation::Exponent => format!("exp({a})"),
        Operation::Radians => format!("radians({a})"),
        Operation::Degrees => format!("degrees({a})"),
        Operation::SmoothMin => format!("smoothmin({a}, {b}, {c})"),
        Operation::SmoothMax => format!("-smoothmin(-({a}), -({b}), {c})"),
        Operation::Compare => {
            format!("(abs({a} - {b}) <= max({c}, FLT_EPSILON)) ? 1.0 : 0.0")
        }
    }
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let op: Operation = e.constant_enum(IN_OPERATION)?;
    let a = e.input(IN_VALUE1)?;
    let b = e.input(IN_VALUE2)?;
    let c = e.input(IN_VALUE3)?;

    let mut code = format!(
        "{} = {};\n",
        e.output_declaration(OUT_VALUE)?,
        expression(op, &a, &b, &c)
    );
    code.push_str(&clamp_statement(e, IN_CLAMP, &e.output_var(OUT_VALUE)?)?);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::nodes::create_default_registry;
    use crate::socket::SocketEnum;
    use crate::value::Value;
    use std::sync::Arc;

    #[test]
    fn test_operation_domain() {
        assert_eq!(Operation::VARIANTS.len(), 41);
        assert_eq!(Operation::from_raw(40), Some(Operation::Compare));
        assert_eq!(Operation::PingPong.name(), "pingpong");
    }

    #[test]
    fn test_three_operand_forms() {
        assert_eq!(expression(Operation::MultiplyAdd, "a", "b", "c"), "a * b + c");
        assert_eq!(
            expression(Operation::SmoothMax, "a", "b", "c"),
            "-smoothmin(-(a), -(b), c)"
        );
    }

    #[test]
    fn test_smooth_max_negative_literal() {
        let mut graph = Graph::new("math", Arc::new(create_default_registry()));
        let m = graph.add_node(TYPE).unwrap();
        graph
            .set_input_value(m, IN_OPERATION, Value::Enum(Operation::SmoothMax.to_raw()))
            .unwrap();
        graph.set_input_value(m, IN_VALUE1, -1.0f32).unwrap();
        let body = graph.generate_code().unwrap().body;
        assert!(
            body.contains("float var0_0 = -smoothmin(-(-1.0), -(0.5), 0.0);"),
            "{body}"
        );
        assert!(!body.contains("--"));
    }

    #[test]
    fn test_power_of_literals() {
        let mut graph = Graph::new("math", Arc::new(create_default_registry()));
        let m = graph.add_node(TYPE).unwrap();
        graph
            .set_input_value(m, IN_OPERATION, Value::Enum(Operation::Power.to_raw()))
            .unwrap();
        graph.set_input_value(m, IN_VALUE1, 2.0f32).unwrap();
        graph.set_input_value(m, IN_VALUE2, 8.0f32).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("float var0_0 = pow(2.0, 8.0);"), "{}", code.body);
    }

    #[test]
    fn test_out_of_domain_operation_rejected() {
        let mut graph = Graph::new("math", Arc::new(create_default_registry()));
        let m = graph.add_node(TYPE).unwrap();
        assert!(graph.set_input_value(m, IN_OPERATION, Value::Enum(99)).is_err());
    }
}
