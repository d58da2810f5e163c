// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brightness and contrast adjustment.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "bright_contrast";
/// Input color
pub const IN_COLOR: &str = "color";
/// Brightness offset
pub const IN_BRIGHT: &str = "bright";
/// Contrast amount
pub const IN_CONTRAST: &str = "contrast";
/// Adjusted color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_input(Socket::new(IN_BRIGHT, DataType::Float))
        .with_input(Socket::new(IN_CONTRAST, DataType::Float))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let contrast = e.input(IN_CONTRAST)?;
    let a = e.local_var("a");
    let b = e.local_var("b");
    Ok(format!(
        "float {a} = 1.0 + {contrast};\n\
         float {b} = {bright} - {contrast} * 0.5;\n\
         {decl} = max({a} * {color} + vec3({b}), vec3(0.0));\n",
        bright = e.input(IN_BRIGHT)?,
        color = e.input(IN_COLOR)?,
        decl = e.output_declaration(OUT_COLOR)?,
    ))
}
