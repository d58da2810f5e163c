// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in node catalogue.
//!
//! Each submodule exposes its type name, socket name constants and a
//! `prototype()` constructor.

pub mod bright_contrast;
pub mod clamp;
pub mod combine_hsv;
pub mod combine_xyz;
pub mod emission;
pub mod gamma;
pub mod hue_saturation_value;
pub mod input_parameter;
pub mod invert;
pub mod map_range;
pub mod math;
pub mod mix;
pub mod rgb_to_bw;
pub mod separate_hsv;
pub mod separate_xyz;
pub mod sepia_tone;
pub mod value;
pub mod vector_math;

use crate::codegen::{GenerateError, NodeEmitter};
use crate::node::NodeRegistry;

/// Register every built-in node type
pub fn register_defaults(registry: &mut NodeRegistry) {
    registry.register(value::prototype());
    registry.register(input_parameter::prototype());
    registry.register(math::prototype());
    registry.register(vector_math::prototype());
    registry.register(clamp::prototype());
    registry.register(map_range::prototype());
    registry.register(combine_xyz::prototype());
    registry.register(separate_xyz::prototype());
    registry.register(mix::prototype());
    registry.register(combine_hsv::prototype());
    registry.register(separate_hsv::prototype());
    registry.register(hue_saturation_value::prototype());
    registry.register(gamma::prototype());
    registry.register(invert::prototype());
    registry.register(rgb_to_bw::prototype());
    registry.register(bright_contrast::prototype());
    registry.register(sepia_tone::prototype());
    registry.register(emission::prototype());
}

/// Create a registry holding every built-in node type
pub fn create_default_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_defaults(&mut registry);
    registry
}

/// Statement clamping `var` to [0, 1] according to a boolean input.
///
/// Constant `false` emits nothing, constant `true` clamps unconditionally,
/// and a linked input selects at run time.
pub(crate) fn clamp_statement(
    e: &NodeEmitter<'_>,
    clamp_input: &str,
    var: &str,
) -> Result<String, GenerateError> {
    Ok(match e.constant::<bool>(clamp_input)? {
        Some(false) => String::new(),
        Some(true) => format!("{var} = clamp({var}, 0.0, 1.0);\n"),
        None => format!(
            "{var} = {} ? clamp({var}, 0.0, 1.0) : {var};\n",
            e.input(clamp_input)?
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::node::NodeCategory;
    use std::sync::Arc;

    #[test]
    fn test_every_node_generates_alone() {
        let registry = Arc::new(create_default_registry());
        for prototype in registry.types() {
            let mut graph = Graph::new("single", registry.clone());
            graph.add_node(prototype.type_name()).unwrap();
            let code = graph
                .generate_code()
                .unwrap_or_else(|e| panic!("{} failed: {e}", prototype.type_name()));
            assert!(!code.body.is_empty(), "{} emitted nothing", prototype.type_name());
            for module in prototype.modules() {
                assert!(code.header.contains(&format!("\"{module}.glsl\"")));
            }
        }
    }

    #[test]
    fn test_catalogue_contents() {
        let registry = create_default_registry();
        assert_eq!(registry.len(), 18);
        assert!(registry.get(map_range::TYPE).is_some_and(|p| p.is_macro()));
        assert_eq!(registry.types_in_category(NodeCategory::Color).count(), 9);
    }

    #[test]
    fn test_clamp_statement_forms() {
        let registry = Arc::new(create_default_registry());
        let mut graph = Graph::new("clamp", registry);
        let m = graph.add_node(math::TYPE).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(!code.body.contains("clamp("));

        graph.set_input_value(m, math::IN_CLAMP, true).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("var0_0 = clamp(var0_0, 0.0, 1.0);"));

        let v = graph.add_node(value::TYPE).unwrap();
        graph.link(v, value::OUT_VALUE, m, math::IN_CLAMP).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("var1_0 = var0_0 ? clamp(var1_0, 0.0, 1.0) : var1_0;"));
    }
}
