// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sepia tint.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "sepia_tone";
/// Input color
pub const IN_COLOR: &str = "color";
/// Tinted color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let color = e.input(IN_COLOR)?;
    let gray = e.local_var("gray");
    Ok(format!(
        "float {gray} = dot({color}, vec3(0.3, 0.59, 0.11));\n\
         {decl} = min(vec3(\n\
         \t{gray} * 0.393 + {color}.g * 0.769 + {color}.b * 0.189,\n\
         \t{gray} * 0.349 + {color}.g * 0.686 + {color}.b * 0.168,\n\
         \t{gray} * 0.272 + {color}.g * 0.534 + {color}.b * 0.131\n\
         ), vec3(1.0));\n",
        decl = e.output_declaration(OUT_COLOR)?,
    ))
}
