// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node prototypes and the registry that hands them out.

use crate::codegen::{GenerateError, NodeEmitter};
use crate::graph::{Graph, GraphError};
use crate::graph_node::NodeId;
use crate::socket::{Socket, SocketKey};
use indexmap::IndexMap;
use std::sync::Arc;

/// Emits GLSL for one scheduled node
pub type EmitFn = fn(&NodeEmitter<'_>) -> Result<String, GenerateError>;

/// Rewrites a macro node into an auxiliary subgraph
pub type ExpandFn = fn(&mut Graph, NodeId) -> Result<(), GraphError>;

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Input nodes (constants, parameters)
    Input,
    /// Scalar and vector math
    Math,
    /// Color operations
    Color,
    /// Vector construction and decomposition
    Vector,
    /// Type and range converters
    Converter,
    /// Shading outputs
    Shader,
    /// Custom/user-defined
    Custom,
}

/// The shared, immutable definition of a node type
#[derive(Debug)]
pub struct NodePrototype {
    type_name: String,
    category: NodeCategory,
    inputs: Vec<Socket>,
    outputs: Vec<Socket>,
    modules: Vec<String>,
    evaluate: EmitFn,
    declare: Option<EmitFn>,
    expand: Option<ExpandFn>,
}

impl NodePrototype {
    /// Create a prototype with no sockets
    pub fn new(type_name: impl Into<String>, category: NodeCategory, evaluate: EmitFn) -> Self {
        Self {
            type_name: type_name.into(),
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
            modules: Vec::new(),
            evaluate,
            declare: None,
            expand: None,
        }
    }

    /// Append an input socket
    pub fn with_input(mut self, socket: Socket) -> Self {
        debug_assert!(
            self.inputs.iter().all(|s| s.name != socket.name),
            "duplicate input '{}' on '{}'",
            socket.name,
            self.type_name
        );
        self.inputs.push(socket);
        self
    }

    /// Append an output socket
    pub fn with_output(mut self, socket: Socket) -> Self {
        debug_assert!(
            self.outputs.iter().all(|s| s.name != socket.name),
            "duplicate output '{}' on '{}'",
            socket.name,
            self.type_name
        );
        self.outputs.push(socket);
        self
    }

    /// Declare an external module the generated code depends on
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Set the header declaration emitter
    pub fn with_declare(mut self, declare: EmitFn) -> Self {
        self.declare = Some(declare);
        self
    }

    /// Mark this prototype as a macro node
    pub fn with_expand(mut self, expand: ExpandFn) -> Self {
        self.expand = Some(expand);
        self
    }

    /// Type name used for registry lookup
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Category
    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// Input sockets in declaration order
    pub fn inputs(&self) -> &[Socket] {
        &self.inputs
    }

    /// Output sockets in declaration order
    pub fn outputs(&self) -> &[Socket] {
        &self.outputs
    }

    /// Module dependency ids
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Find an input index by name or position
    pub fn find_input<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<usize> {
        key.into().resolve(&self.inputs)
    }

    /// Find an output index by name or position
    pub fn find_output<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<usize> {
        key.into().resolve(&self.outputs)
    }

    /// Get an input socket
    pub fn input(&self, index: usize) -> Option<&Socket> {
        self.inputs.get(index)
    }

    /// Get an output socket
    pub fn output(&self, index: usize) -> Option<&Socket> {
        self.outputs.get(index)
    }

    pub(crate) fn evaluate_fn(&self) -> EmitFn {
        self.evaluate
    }

    pub(crate) fn declare_fn(&self) -> Option<EmitFn> {
        self.declare
    }

    pub(crate) fn expand_fn(&self) -> Option<ExpandFn> {
        self.expand
    }

    /// Whether this node rewrites itself before scheduling
    pub fn is_macro(&self) -> bool {
        self.expand.is_some()
    }
}

/// Registry of available node types
#[derive(Debug, Default)]
pub struct NodeRegistry {
    types: IndexMap<String, Arc<NodePrototype>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type, replacing any previous one with the same name
    pub fn register(&mut self, prototype: NodePrototype) {
        self.types
            .insert(prototype.type_name.clone(), Arc::new(prototype));
    }

    /// Get a node type by name
    pub fn get(&self, type_name: &str) -> Option<Arc<NodePrototype>> {
        self.types.get(type_name).cloned()
    }

    /// Whether a type is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Get all registered types in registration order
    pub fn types(&self) -> impl Iterator<Item = &NodePrototype> {
        self.types.values().map(AsRef::as_ref)
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodePrototype> {
        self.types().filter(move |t| t.category == category)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DataType;

    fn emit_nothing(_: &NodeEmitter<'_>) -> Result<String, GenerateError> {
        Ok(String::new())
    }

    fn prototype() -> NodePrototype {
        NodePrototype::new("test", NodeCategory::Custom, emit_nothing)
            .with_input(Socket::new("a", DataType::Float))
            .with_input(Socket::new("b", DataType::Color))
            .with_output(Socket::new("out", DataType::Float))
            .with_module("math")
    }

    #[test]
    fn test_find_sockets() {
        let proto = prototype();
        assert_eq!(proto.find_input("b"), Some(1));
        assert_eq!(proto.find_input("out"), None);
        assert_eq!(proto.find_output("out"), Some(0));
        assert_eq!(proto.find_output(1usize), None);
        assert!(!proto.is_macro());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register(prototype());
        assert!(registry.contains("test"));
        assert!(registry.get("missing").is_none());
        let proto = registry.get("test").expect("registered");
        assert_eq!(proto.modules(), ["math".to_string()]);
        assert_eq!(registry.types_in_category(NodeCategory::Custom).count(), 1);
        assert_eq!(registry.types_in_category(NodeCategory::Math).count(), 0);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = NodeRegistry::new();
        registry.register(prototype());
        registry.register(NodePrototype::new("test", NodeCategory::Math, emit_nothing));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("test").map(|p| p.category()), Some(NodeCategory::Math));
    }
}
