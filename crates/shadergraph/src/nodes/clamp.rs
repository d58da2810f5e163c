// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clamp a float between two bounds.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "clamp";
/// Bound interpretation
pub const IN_CLAMP_TYPE: &str = "clamp_type";
/// Value to clamp
pub const IN_VALUE: &str = "value";
/// Lower bound
pub const IN_MIN: &str = "min";
/// Upper bound
pub const IN_MAX: &str = "max";
/// Clamped value
pub const OUT_RESULT: &str = "result";

crate::socket_enum! {
    /// How the bounds are interpreted
    pub enum ClampType {
        /// `min` is the lower bound and `max` the upper one
        MinMax = 0 => "min_max",
        /// The bounds may come in either order
        Range = 1 => "range",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Converter, evaluate)
        .with_input(Socket::enumeration(IN_CLAMP_TYPE, ClampType::MinMax))
        .with_input(Socket::new(IN_VALUE, DataType::Float).with_default(1.0f32))
        .with_input(Socket::new(IN_MIN, DataType::Float))
        .with_input(Socket::new(IN_MAX, DataType::Float).with_default(1.0f32))
        .with_output(Socket::new(OUT_RESULT, DataType::Float))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let clamp_type: ClampType = e.constant_enum(IN_CLAMP_TYPE)?;
    let value = e.input(IN_VALUE)?;
    let min = e.input(IN_MIN)?;
    let max = e.input(IN_MAX)?;
    let decl = e.output_declaration(OUT_RESULT)?;

    Ok(match clamp_type {
        ClampType::MinMax => format!("{decl} = clamp({value}, {min}, {max});\n"),
        ClampType::Range => {
            let out = e.output_var(OUT_RESULT)?;
            format!(
                "{decl};\n\
                 if ({min} > {max}) {{\n\
                 \t{out} = clamp({value}, {max}, {min});\n\
                 }} else {{\n\
                 \t{out} = clamp({value}, {min}, {max});\n\
                 }}\n"
            )
        }
    })
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
    fn test_min_max() {
        let mut graph = Graph::new("clamp", Arc::new(create_default_registry()));
        let c = graph.add_node(TYPE).unwrap();
        graph.set_input_value(c, IN_VALUE, 4.0f32).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("float var0_0 = clamp(4.0, 0.0, 1.0);"), "{}", code.body);
        assert!(code.header.is_empty());
    }

    #[test]
    fn test_range_accepts_swapped_bounds() {
        let mut graph = Graph::new("clamp", Arc::new(create_default_registry()));
        let c = graph.add_node(TYPE).unwrap();
        graph
            .set_input_value(c, IN_CLAMP_TYPE, Value::Enum(ClampType::Range.to_raw()))
            .unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("float var0_0;\nif (0.0 > 1.0) {\n"), "{}", code.body);
        assert!(code.body.contains("\tvar0_0 = clamp(1.0, 1.0, 0.0);\n"));
        assert!(code.body.contains("\tvar0_0 = clamp(1.0, 0.0, 1.0);\n"));
    }
}
