// SPDX-License-Identifier: MIT OR Apache-2.0
//! Invert a color.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "invert";
/// Blend between the input and its inverse
pub const IN_FAC: &str = "fac";
/// Input color
pub const IN_COLOR: &str = "color";
/// Inverted color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(
            Socket::new(IN_FAC, DataType::Float)
                .with_default(1.0f32)
                .with_range(0.0, 1.0),
        )
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let color = e.input(IN_COLOR)?;
    Ok(format!(
        "{} = mix({color}, vec3(1.0) - {color}, {});\n",
        e.output_declaration(OUT_COLOR)?,
        e.input(IN_FAC)?
    ))
}
