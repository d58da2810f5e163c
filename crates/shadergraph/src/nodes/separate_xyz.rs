// SPDX-License-Identifier: MIT OR Apache-2.0
//! Split a vector into its components.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "separate_xyz";
/// Vector to split
pub const IN_VECTOR: &str = "vector";
/// X component
pub const OUT_X: &str = "x";
/// Y component
pub const OUT_Y: &str = "y";
/// Z component
pub const OUT_Z: &str = "z";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Vector, evaluate)
        .with_input(Socket::new(IN_VECTOR, DataType::Vector))
        .with_output(Socket::new(OUT_X, DataType::Float))
        .with_output(Socket::new(OUT_Y, DataType::Float))
        .with_output(Socket::new(OUT_Z, DataType::Float))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let vector = e.input(IN_VECTOR)?;
    let mut code = String::new();
    for (output, component) in [(OUT_X, 'x'), (OUT_Y, 'y'), (OUT_Z, 'z')] {
        code.push_str(&format!(
            "{} = {vector}.{component};\n",
            e.output_declaration(output)?
        ));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::nodes::{combine_xyz, create_default_registry};
    use std::sync::Arc;

    #[test]
    fn test_combine_then_separate() {
        let mut graph = Graph::new("xyz", Arc::new(create_default_registry()));
        let sep = graph.add_node(TYPE).unwrap();
        let comb = graph.add_node(combine_xyz::TYPE).unwrap();
        graph.set_input_value(comb, combine_xyz::IN_Y, 2.0f32).unwrap();
        graph
            .link(comb, combine_xyz::OUT_VECTOR, sep, IN_VECTOR)
            .unwrap();

        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("vec3 var0_0 = vec3(0.0, 2.0, 0.0);\n"));
        assert!(code.body.contains(
            "float var1_0 = var0_0.x;\nfloat var1_1 = var0_0.y;\nfloat var1_2 = var0_0.z;\n"
        ));
    }
}
