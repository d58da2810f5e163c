// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gamma curve applied to the positive channels of a color.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "gamma";
/// Input color
pub const IN_COLOR: &str = "color";
/// Exponent
pub const IN_GAMMA: &str = "gamma";
/// Corrected color
pub const OUT_COLOR: &str = "color";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_input(Socket::new(IN_GAMMA, DataType::Float).with_default(1.0f32))
        .with_output(Socket::new(OUT_COLOR, DataType::Color))
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let gamma = e.input(IN_GAMMA)?;
    let out = e.output_var(OUT_COLOR)?;

    let mut code = format!(
        "{} = {};\n",
        e.output_declaration(OUT_COLOR)?,
        e.input(IN_COLOR)?
    );
    code.push_str(&format!("if ({gamma} == 0.0) {{\n\t{out} = vec3(1.0);\n}} else {{\n"));
    for c in ['x', 'y', 'z'] {
        code.push_str(&format!(
            "\tif ({out}.{c} > 0.0) {out}.{c} = pow({out}.{c}, {gamma});\n"
        ));
    }
    code.push_str("}\n");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::nodes::create_default_registry;
    use std::sync::Arc;

    #[test]
    fn test_gamma_writes_only_its_own_variable() {
        let mut graph = Graph::new("gamma", Arc::new(create_default_registry()));
        let g = graph.add_node(TYPE).unwrap();
        graph.set_input_value(g, IN_GAMMA, 2.2f32).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("vec3 var0_0 = vec3(0.0, 0.0, 0.0);\nif (2.2 == 0.0) {\n"));
        assert!(code.body.contains("\tif (var0_0.y > 0.0) var0_0.y = pow(var0_0.y, 2.2);\n"));
    }
}
