// SPDX-License-Identifier: MIT OR Apache-2.0
//! Remap a float from one range into another.
//!
//! With a constant `clamp` input set, the node expands into an auxiliary
//! [`clamp`](super::clamp) node that takes over its consumers.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::graph::{Graph, GraphError};
use crate::graph_node::NodeId;
use crate::node::{NodeCategory, NodePrototype};
use crate::nodes::clamp;
use crate::socket::{Socket, SocketEnum};
use crate::value::{DataType, Value};

/// Registry type name
pub const TYPE: &str = "map_range";
/// Interpolation type
pub const IN_TYPE: &str = "type";
/// Value to remap
pub const IN_VALUE: &str = "value";
/// Source range start
pub const IN_FROM_MIN: &str = "from_min";
/// Source range end
pub const IN_FROM_MAX: &str = "from_max";
/// Target range start
pub const IN_TO_MIN: &str = "to_min";
/// Target range end
pub const IN_TO_MAX: &str = "to_max";
/// Step count for [`MapType::Stepped`]
pub const IN_STEPS: &str = "steps";
/// Clamp the result to the target range
pub const IN_CLAMP: &str = "clamp";
/// Remapped value
pub const OUT_RESULT: &str = "result";

crate::socket_enum! {
    /// Interpolation between the range ends
    pub enum MapType {
        /// Linear
        Linear = 0 => "linear",
        /// Linear, quantized to `steps` levels
        Stepped = 1 => "stepped",
        /// Hermite smoothstep
        Smoothstep = 2 => "smoothstep",
        /// Perlin's smootherstep
        Smootherstep = 3 => "smootherstep",
    }
}

/// Build the prototype
pub fn prototype() -> NodePrototype {
    NodePrototype::new(TYPE, NodeCategory::Converter, evaluate)
        .with_input(Socket::enumeration(IN_TYPE, MapType::Linear))
        .with_input(Socket::new(IN_VALUE, DataType::Float).with_default(1.0f32))
        .with_input(Socket::new(IN_FROM_MIN, DataType::Float))
        .with_input(Socket::new(IN_FROM_MAX, DataType::Float).with_default(1.0f32))
        .with_input(Socket::new(IN_TO_MIN, DataType::Float))
        .with_input(Socket::new(IN_TO_MAX, DataType::Float).with_default(1.0f32))
        .with_input(Socket::new(IN_STEPS, DataType::Float).with_default(4.0f32))
        .with_input(Socket::new(IN_CLAMP, DataType::Boolean))
        .with_output(Socket::new(OUT_RESULT, DataType::Float))
        .with_module("math")
        .with_expand(expand)
}

/// Route the result through a range clamp when clamping is enabled.
fn expand(graph: &mut Graph, id: NodeId) -> Result<(), GraphError> {
    let node = graph.node_or_err(id)?;
    let clamped = !node.is_input_linked(IN_CLAMP)
        && node.input_value_or_default(IN_CLAMP) == Some(&Value::Boolean(true));
    if !clamped {
        return Ok(());
    }

    let aux = graph.add_node(clamp::TYPE)?;
    graph.set_input_value(
        aux,
        clamp::IN_CLAMP_TYPE,
        Value::Enum(clamp::ClampType::Range.to_raw()),
    )?;
    graph.relink(id, OUT_RESULT, aux, clamp::OUT_RESULT)?;
    graph.link(id, OUT_RESULT, aux, clamp::IN_VALUE)?;
    graph.propagate_input(id, IN_TO_MIN, aux, clamp::IN_MIN)?;
    graph.propagate_input(id, IN_TO_MAX, aux, clamp::IN_MAX)?;
    Ok(())
}

fn evaluate(e: &NodeEmitter<'_>) -> Result<String, GenerateError> {
    let map_type: MapType = e.constant_enum(IN_TYPE)?;
    let value = e.input(IN_VALUE)?;
    let from_min = e.input(IN_FROM_MIN)?;
    let from_max = e.input(IN_FROM_MAX)?;
    let to_min = e.input(IN_TO_MIN)?;
    let to_max = e.input(IN_TO_MAX)?;
    let out = e.output_var(OUT_RESULT)?;
    let factor = e.local_var("factor");

    let mut code = format!(
        "{};\nif ({from_max} != {from_min}) {{\n",
        e.output_declaration(OUT_RESULT)?
    );
    match map_type {
        MapType::Linear | MapType::Stepped => {
            code.push_str(&format!(
                "\tfloat {factor} = ({value} - {from_min}) / ({from_max} - {from_min});\n"
            ));
            if map_type == MapType::Stepped {
                let steps = e.input(IN_STEPS)?;
                code.push_str(&format!(
                    "\t{factor} = ({steps} > 0.0) ? floor({factor} * ({steps} + 1.0)) / {steps} : 0.0;\n"
                ));
            }
        }
        MapType::Smoothstep | MapType::Smootherstep => {
            let f = map_type.name();
            code.push_str(&format!(
                "\tfloat {factor} = ({from_min} > {from_max}) ? 1.0 - {f}({from_max}, {from_min}, {value}) : {f}({from_min}, {from_max}, {value});\n"
            ));
        }
    }
    code.push_str(&format!(
        "\t{out} = {to_min} + {factor} * ({to_max} - {to_min});\n\
         }} else {{\n\
         \t{out} = 0.0;\n\
         }}\n"
    ));

    // A constant clamp is handled by expansion; a linked one is decided at run time.
    if e.constant::<bool>(IN_CLAMP)?.is_none() {
        code.push_str(&format!(
            "{out} = {} ? clamp({out}, min({to_min}, {to_max}), max({to_min}, {to_max})) : {out};\n",
            e.input(IN_CLAMP)?
        ));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{create_default_registry, math, value};
    use std::sync::Arc;

    fn graph() -> Graph {
        Graph::new("map", Arc::new(create_default_registry()))
    }

    #[test]
    fn test_unclamped_does_not_expand() {
        let mut graph = graph();
        graph.add_node(TYPE).unwrap();
        assert_eq!(graph.expand(), Ok(1));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_expansion_takes_over_consumers() {
        let mut graph = graph();
        let m = graph.add_node(TYPE).unwrap();
        let consumer = graph.add_node(math::TYPE).unwrap();
        graph.set_input_value(m, IN_CLAMP, true).unwrap();
        graph.set_input_value(m, IN_TO_MAX, 5.0f32).unwrap();
        graph.link(m, OUT_RESULT, consumer, math::IN_VALUE1).unwrap();

        let mut expanded = graph.clone();
        expanded.expand().unwrap();
        assert_eq!(expanded.node_count(), 3);
        let aux = expanded.node_at(2).unwrap();
        assert_eq!(aux.type_name(), clamp::TYPE);
        assert_eq!(
            aux.input_link(clamp::IN_VALUE).map(|h| h.node),
            Some(m)
        );
        assert_eq!(aux.input_value(clamp::IN_MAX), Some(&Value::Float(5.0)));
        assert_eq!(
            expanded.node(consumer).unwrap().input_link(math::IN_VALUE1).map(|h| h.node),
            Some(aux.id())
        );
        assert!(expanded.links_consistent());

        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("// clamp1 (clamp)"), "{}", code.body);
        assert!(code.body.contains("\tvar1_0 = clamp(var0_0, 0.0, 5.0);\n"));
        assert!(code.body.contains("float var2_0 = var1_0 + 0.5;"));
    }

    #[test]
    fn test_linked_to_range_is_propagated() {
        let mut graph = graph();
        let v = graph.add_node(value::TYPE).unwrap();
        let m = graph.add_node(TYPE).unwrap();
        graph.set_input_value(m, IN_CLAMP, true).unwrap();
        graph.link(v, value::OUT_VALUE, m, IN_TO_MIN).unwrap();
        graph.expand().unwrap();

        let aux = graph.node_at(2).unwrap();
        assert_eq!(aux.input_link(clamp::IN_MIN).map(|h| h.node), Some(v));
    }

    #[test]
    fn test_linked_clamp_checked_at_run_time() {
        let mut graph = graph();
        let v = graph.add_node(value::TYPE).unwrap();
        let m = graph.add_node(TYPE).unwrap();
        graph.link(v, value::OUT_VALUE, m, IN_CLAMP).unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains(
            "var1_0 = var0_0 ? clamp(var1_0, min(0.0, 1.0), max(0.0, 1.0)) : var1_0;"
        ));
    }

    #[test]
    fn test_smoothstep() {
        let mut graph = graph();
        let m = graph.add_node(TYPE).unwrap();
        graph
            .set_input_value(m, IN_TYPE, Value::Enum(MapType::Smoothstep.to_raw()))
            .unwrap();
        let code = graph.generate_code().unwrap();
        assert!(code.body.contains("smoothstep(0.0, 1.0, 1.0)"), "{}", code.body);
    }
}
