// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constant float value.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "value";
/// The constant
pub const IN_VALUE: &str = "value";
/// The constant, as a variable
pub const OUT_VALUE: &str = "value";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Input, evaluate)
        .with_input(Socket::new(IN_VALUE, DataType::Float))
        .with_output(Socket::new(OUT_VALUE, DataType::Float))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    Ok(format!(
        "{} = {};\n",
        e.output_declaration(OUT_VALUE)?,
        e.input(IN_VALUE)?
    ))
}
