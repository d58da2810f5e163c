// SPDX-License-Identifier: MIT OR Apache-2.0
//! Luminance of a color.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "rgb_to_bw";
/// Input color
pub const IN_COLOR: &str = "color";
/// Luminance
pub const OUT_VAL: &str = "val";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_VAL, DataType::Float))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    // BT.709 luma weights
    Ok(format!(
        "{} = dot({}, vec3(0.2126729, 0.7151522, 0.072175));\n",
        e.output_declaration(OUT_VAL)?,
        e.input(IN_COLOR)?
    ))
}
