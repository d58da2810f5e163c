// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node graph IR with GLSL code generation.
//!
//! A [`Graph`] holds node instances created from prototypes in a
//! [`NodeRegistry`]. Nodes are linked output-to-input, scheduled
//! topologically and turned into GLSL source.
//!
//! ## Architecture
//!
//! - [`node`]: prototypes (sockets, module dependencies, emitters) and the registry
//! - [`graph`] and [`link`]: node storage, naming, values and link editing
//! - [`schedule`]: deterministic topological ordering
//! - [`codegen`]: macro expansion and header/body emission
//! - [`nodes`]: the built-in node catalogue
//! - [`document`]: RON persistence by display name
//!
//! ```
//! use shadergraph::{create_default_registry, nodes::{math, value}, Graph};
//! use std::sync::Arc;
//!
//! let mut graph = Graph::new("example", Arc::new(create_default_registry()));
//! let v = graph.add_node(value::TYPE)?;
//! let m = graph.add_node(math::TYPE)?;
//! graph.set_input_value(v, value::IN_VALUE, 2.0f32)?;
//! graph.link(v, value::OUT_VALUE, m, math::IN_VALUE1)?;
//!
//! let code = graph.generate_code()?;
//! assert!(code.body.contains("float var1_0 = var0_0 + 0.5;"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codegen;
pub mod document;
pub mod graph;
pub mod graph_node;
pub mod link;
pub mod node;
pub mod nodes;
pub mod schedule;
pub mod socket;
pub mod value;

pub use codegen::{GenerateError, GeneratedCode, GeneratorOptions, ModuleOrder, NodeEmitter};
pub use document::{DocumentError, GraphDocument};
pub use graph::{Graph, GraphError};
pub use graph_node::{GraphNode, InputSocket, NodeId, OutputSocket, SocketHandle};
pub use node::{NodeCategory, NodePrototype, NodeRegistry};
pub use nodes::create_default_registry;
pub use schedule::{topological_order, CycleError};
pub use socket::{Socket, SocketDirection, SocketEnum, SocketKey};
pub use value::{DataType, FromValue, Value};
