// SPDX-License-Identifier: MIT OR Apache-2.0
//! GLSL code generation.
//!
//! Generation always runs on a private copy of the graph: macro nodes are
//! expanded, the copy is scheduled, and each node in schedule order emits
//! its header declarations and body statements.

use crate::graph::{Graph, GraphError};
use crate::graph_node::{GraphNode, NodeId};
use crate::schedule::CycleError;
use crate::socket::{SocketEnum, SocketKey};
use crate::value::{DataType, FromValue, Value};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Order of module include directives in the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleOrder {
    /// First appearance in schedule order
    #[default]
    Encounter,
    /// Lexicographic
    Sorted,
}

/// Code generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Prefix each node's code with a comment naming it
    pub emit_comments: bool,
    /// Include directive template; `{module}` is replaced by the module id
    pub include_format: String,
    /// Order of include directives
    pub module_order: ModuleOrder,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            include_format: "#include \"{module}.glsl\"".to_string(),
            module_order: ModuleOrder::Encounter,
        }
    }
}

impl GeneratorOptions {
    /// Include directive for one module
    pub fn include_directive(&self, module: &str) -> String {
        self.include_format.replace("{module}", module)
    }
}

/// Generated shader source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Includes and resource declarations
    pub header: String,
    /// Evaluation statements
    pub body: String,
}

impl Graph {
    /// Expand every macro node, including macro nodes added by earlier
    /// expansions. Returns the number of expansions run.
    ///
    /// Expanders may append nodes but must not remove any.
    pub fn expand(&mut self) -> Result<usize, GraphError> {
        let mut position = 0;
        let mut expanded = 0;
        while let Some((&id, node)) = self.nodes.get_index(position) {
            if let Some(expand) = node.prototype().expand_fn() {
                debug!(node = node.name(), "expanding macro node");
                expand(self, id)?;
                expanded += 1;
            }
            position += 1;
        }
        Ok(expanded)
    }

    /// Generate code with default options
    pub fn generate_code(&self) -> Result<GeneratedCode, GenerateError> {
        self.generate_code_with(&GeneratorOptions::default())
    }

    /// Generate code. The graph itself is never modified.
    pub fn generate_code_with(
        &self,
        options: &GeneratorOptions,
    ) -> Result<GeneratedCode, GenerateError> {
        let mut graph = self.clone();
        graph.expand()?;
        let order = graph.schedule()?;

        let mut modules: IndexSet<&str> = IndexSet::new();
        for id in &order {
            modules.extend(graph.nodes[id].prototype().modules().iter().map(String::as_str));
        }
        if options.module_order == ModuleOrder::Sorted {
            modules.sort();
        }

        let mut code = GeneratedCode::default();
        for module in &modules {
            code.header.push_str(&options.include_directive(module));
            code.header.push('\n');
        }

        for (index, id) in order.iter().enumerate() {
            let node = &graph.nodes[id];
            let emitter = NodeEmitter {
                graph: &graph,
                node,
                index,
            };
            trace!(node = node.name(), index, "emitting node");

            if let Some(declare) = node.prototype().declare_fn() {
                let text = declare(&emitter)?;
                if !text.is_empty() {
                    emit(&mut code.header, options, node, &text);
                }
            }
            let text = (node.prototype().evaluate_fn())(&emitter)?;
            emit(&mut code.body, options, node, &text);
        }
        debug!(
            graph = %self.name,
            nodes = order.len(),
            modules = modules.len(),
            "generated code"
        );
        Ok(code)
    }
}

fn emit(stream: &mut String, options: &GeneratorOptions, node: &GraphNode, text: &str) {
    if options.emit_comments {
        stream.push_str(&format!("// {} ({})\n", node.name(), node.type_name()));
    }
    stream.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        stream.push('\n');
    }
}

/// View of one scheduled node handed to its prototype's emitters
pub struct NodeEmitter<'a> {
    graph: &'a Graph,
    node: &'a GraphNode,
    index: usize,
}

impl<'a> NodeEmitter<'a> {
    /// The scheduled graph
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// The node being emitted
    pub fn node(&self) -> &'a GraphNode {
        self.node
    }

    /// Schedule index of the node
    pub fn index(&self) -> usize {
        self.index
    }

    /// Variable prefix unique to this node (`var3`)
    pub fn base_var(&self) -> String {
        format!("var{}", self.index)
    }

    /// Helper variable unique to this node (`var3_suffix`)
    pub fn local_var(&self, suffix: &str) -> String {
        format!("var{}_{}", self.index, suffix)
    }

    /// Variable holding one of this node's outputs (`var3_0`)
    pub fn output_var<'k>(&self, output: impl Into<SocketKey<'k>>) -> Result<String, GenerateError> {
        let output = self.node.resolve_output(output.into())?;
        Ok(format!("var{}_{}", self.index, output))
    }

    /// Typed declaration of an output variable (`float var3_0`)
    pub fn output_declaration<'k>(
        &self,
        output: impl Into<SocketKey<'k>>,
    ) -> Result<String, GenerateError> {
        let output = self.node.resolve_output(output.into())?;
        let socket = &self.node.prototype().outputs()[output];
        let ty = socket
            .data_type
            .glsl_type()
            .ok_or_else(|| self.unsupported(&socket.name, socket.data_type))?;
        Ok(format!("{ty} var{}_{}", self.index, output))
    }

    /// Expression for an input: the producer's variable when linked,
    /// otherwise a literal of the stored or default value
    pub fn input<'k>(&self, input: impl Into<SocketKey<'k>>) -> Result<String, GenerateError> {
        let index = self.node.resolve_input(input.into())?;
        if let Some(producer) = self.node.inputs()[index].link() {
            let node = self.graph.node(producer.node).unwrap_or_else(|| {
                panic!("broken invariant: producer {} missing during emission", producer.node)
            });
            let producer_index = node.index().unwrap_or_else(|| {
                panic!("broken invariant: producer '{}' was not scheduled", node.name())
            });
            return Ok(format!("var{}_{}", producer_index, producer.socket));
        }
        let socket = &self.node.prototype().inputs()[index];
        self.stored_or_default(index)
            .to_glsl()
            .ok_or_else(|| self.unsupported(&socket.name, socket.data_type))
    }

    /// Constant value of an unlinked input; `None` when the input is linked
    pub fn constant<'k, T: FromValue>(
        &self,
        input: impl Into<SocketKey<'k>>,
    ) -> Result<Option<T>, GenerateError> {
        let index = self.node.resolve_input(input.into())?;
        if self.node.inputs()[index].is_linked() {
            return Ok(None);
        }
        let socket = &self.node.prototype().inputs()[index];
        T::from_value(self.stored_or_default(index))
            .map(Some)
            .ok_or_else(|| self.unsupported(&socket.name, socket.data_type))
    }

    /// Enum value of an input that must not be linked
    pub fn constant_enum<'k, E: SocketEnum>(
        &self,
        input: impl Into<SocketKey<'k>>,
    ) -> Result<E, GenerateError> {
        let index = self.node.resolve_input(input.into())?;
        let socket = &self.node.prototype().inputs()[index];
        if self.node.inputs()[index].is_linked() {
            return Err(GenerateError::NonConstantInput {
                node: self.node.name().to_string(),
                socket: socket.name.clone(),
            });
        }
        match self.stored_or_default(index) {
            Value::Enum(raw) => E::from_raw(*raw),
            _ => None,
        }
        .ok_or_else(|| self.unsupported(&socket.name, socket.data_type))
    }

    fn stored_or_default(&self, index: usize) -> &'a Value {
        let node = self.node;
        node.inputs()[index]
            .value()
            .unwrap_or(&node.prototype().inputs()[index].default_value)
    }

    fn unsupported(&self, socket: &str, data_type: DataType) -> GenerateError {
        GenerateError::UnsupportedConversion {
            node: self.node.name().to_string(),
            socket: socket.to_string(),
            data_type,
        }
    }

    /// ID of the node being emitted
    pub fn id(&self) -> NodeId {
        self.node.id()
    }
}

/// Error that aborts one code generation call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// The graph cannot be ordered
    #[error(transparent)]
    CyclicGraph(#[from] CycleError),

    /// Structural failure during expansion or socket lookup
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A value or type has no GLSL rendering
    #[error("Socket '{socket}' on node '{node}' has no GLSL form for type {data_type}")]
    UnsupportedConversion {
        /// Node display name
        node: String,
        /// Socket name
        socket: String,
        /// Offending type
        data_type: DataType,
    },

    /// An input that selects code paths was linked instead of set
    #[error("Input '{socket}' on node '{node}' must be a constant")]
    NonConstantInput {
        /// Node display name
        node: String,
        /// Socket name
        socket: String,
    },
}
