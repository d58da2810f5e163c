// SPDX-License-Identifier: MIT OR Apache-2.0
//! Split an RGB color into hue, saturation and value.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::{NodeCategory, NodePrototype};
use crate::socket::Socket;
use crate::value::DataType;

/// Registry type name
pub const TYPE: &str = "separate_hsv";
/// RGB color
pub const IN_COLOR: &str = "color";
/// Hue
pub const OUT_H: &str = "h";
/// Saturation
pub const OUT_S: &str = "s";
/// Value
pub const OUT_V: &str = "v";

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Color, evaluate)
        .with_input(Socket::new(IN_COLOR, DataType::Color))
        .with_output(Socket::new(OUT_H, DataType::Float))
        .with_output(Socket::new(OUT_S, DataType::Float))
        .with_output(Socket::new(OUT_V, DataType::Float))
        .with_module("color")
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let hsv = e.local_var("hsv");
    let mut code = format!("vec3 {hsv} = rgb_to_hsv({});\n", e.input(IN_COLOR)?);
    for (output, component) in [(OUT_H, 'x'), (OUT_S, 'y'), (OUT_V, 'z')] {
        code.push_str(&format!(
            "{} = {hsv}.{component};\n",
            e.output_declaration(output)?
        ));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::nodes::{combine_hsv, create_default_registry};
    use std::sync::Arc;

    #[test]
    fn test_hsv_round_trip_code() {
        let mut graph = Graph::new("hsv", Arc::new(create_default_registry()));
        let sep = graph.add_node(TYPE).unwrap();
        let comb = graph.add_node(combine_hsv::TYPE).unwrap();
        graph.link(sep, OUT_H, comb, combine_hsv::IN_H).unwrap();
        graph.link(sep, OUT_V, comb, combine_hsv::IN_V).unwrap();

        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("vec3 var0_hsv = rgb_to_hsv(vec3(0.0, 0.0, 0.0));\n"));
        assert!(code.body.contains("float var0_2 = var0_hsv.z;\n"));
        assert!(code.body.contains("vec3 var1_0 = hsv_to_rgb(vec3(var0_0, 0.0, var0_2));\n"));
        // Both nodes share one module.
        assert_eq!(code.header, "#include \"color.glsl\"\n");
    }
}
