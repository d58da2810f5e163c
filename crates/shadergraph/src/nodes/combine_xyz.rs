// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build a vector from three floats.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "combine_xyz";
/// X component
pub const IN_X: &str = "x";
/// Y component
pub const IN_Y: &str = "y";
/// Z component
pub const IN_Z: &str = "z";
/// Combined vector
pub const OUT_VECTOR: &str = "vector";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Vector, evaluate)
        .with_input(Socket::new(IN_X, DataType::Float))
        .with_input(Socket::new(IN_Y, DataType::Float))
        .with_input(Socket::new(IN_Z, DataType::Float))
        .with_output(Socket::new(OUT_VECTOR, DataType::Vector))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    Ok(format!(
        "{} = vec3({}, {}, {});\n",
        e.output_declaration(OUT_VECTOR)?,
        e.input(IN_X)?,
        e.input(IN_Y)?,
        e.input(IN_Z)?
    ))
}
