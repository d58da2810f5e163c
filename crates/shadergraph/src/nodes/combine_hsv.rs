// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build an RGB color from hue, saturation and value.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "combine_hsv";
/// Hue
pub const IN_H: &str = "h";
/// Saturation
pub const IN_S: &str = "s";
/// Value
pub const IN_V: &str = "v";
/// RGB color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_H, DataType::Float).with_range(0.0, 1.0))
        .with_input(Socket::new(IN_S, DataType::Float).with_range(0.0, 1.0))
        .with_input(Socket::new(IN_V, DataType::Float).with_range(0.0, 1.0))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
        .with_module("color")
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    Ok(format!(
        "{} = hsv_to_rgb(vec3({}, {}, {}));\n",
        e.output_declaration(OUT_COLOR)?,
        e.input(IN_H)?,
        e.input(IN_S)?,
        e.input(IN_V)?
    ))
}
