// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named float uniform supplied by the host application.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "input_parameter";
/// Uniform identifier
pub const IN_NAME: &str = "name";
/// Initial uniform value
pub const IN_DEFAULT: &str = "default";
/// Current uniform value
pub const OUT_VALUE: &str = "value";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Input, evaluate)
        .with_input(Socket::new(IN_NAME, DataType::String).with_default("param"))
        .with_input(Socket::new(IN_DEFAULT, DataType::Float))
        .with_output(Socket::new(OUT_VALUE, DataType::Float))
        .with_declare(declare)
}

fn uniform_name(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let name = e.constant::<String>(IN_NAME)?.ok_or_else(|| GenerateError::NonConstantInput {
        node: e.node().name().to_string(),
        socket: IN_NAME.to_string(),
    })?;
    if !is_identifier(&name) {
        return Err(GenerateError::UnsupportedConversion {
            node: e.node().name().to_string(),
            socket: IN_NAME.to_string(),
            data_type: DataType::String,
        });
    }
    Ok(name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn declare(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    Ok(format!(
        "uniform float {} = {};\n",
        uniform_name(e)?,
        e.input(IN_DEFAULT)?
    ))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    Ok(format!(
        "{} = {};\n",
        e.output_declaration(OUT_VALUE)?,
        uniform_name(e)?
    ))
}
