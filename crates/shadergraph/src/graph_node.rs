// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances placed in a graph, with their per-socket state.

use crate::graph::GraphError;
use crate::node::NodePrototype;
use crate::socket::{Socket, SocketDirection, SocketKey};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable handle of a node within its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One end of a link: a socket on a specific node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketHandle {
    /// Owning node
    pub node: NodeId,
    /// Socket index within the node's inputs or outputs
    pub socket: usize,
}

impl SocketHandle {
    /// Create a handle
    pub fn new(node: NodeId, socket: usize) -> Self {
        Self { node, socket }
    }
}

/// Per-instance state of an input socket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSocket {
    pub(crate) value: Option<Value>,
    pub(crate) link: Option<SocketHandle>,
}

impl InputSocket {
    /// Explicitly set value, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Producing output, if linked
    pub fn link(&self) -> Option<SocketHandle> {
        self.link
    }

    /// Whether an output feeds this input
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// Per-instance state of an output socket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSocket {
    pub(crate) links: Vec<SocketHandle>,
}

impl OutputSocket {
    /// Inputs consuming this output, in link order
    pub fn links(&self) -> &[SocketHandle] {
        &self.links
    }

    /// Whether any input consumes this output
    pub fn is_linked(&self) -> bool {
        !self.links.is_empty()
    }
}

/// A node prototype placed in a graph
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: NodeId,
    name: String,
    prototype: Arc<NodePrototype>,
    pub(crate) inputs: Vec<InputSocket>,
    pub(crate) outputs: Vec<OutputSocket>,
    pub(crate) index: Option<usize>,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, name: String, prototype: Arc<NodePrototype>) -> Self {
        Self {
            id,
            name,
            inputs: vec![InputSocket::default(); prototype.inputs().len()],
            outputs: vec![OutputSocket::default(); prototype.outputs().len()],
            prototype,
            index: None,
        }
    }

    /// Node handle
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name, unique within the graph
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prototype type name
    pub fn type_name(&self) -> &str {
        self.prototype.type_name()
    }

    /// Shared prototype
    pub fn prototype(&self) -> &Arc<NodePrototype> {
        &self.prototype
    }

    /// Index assigned by the most recent schedule, cleared by structural edits
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Input socket states
    pub fn inputs(&self) -> &[InputSocket] {
        &self.inputs
    }

    /// Output socket states
    pub fn outputs(&self) -> &[OutputSocket] {
        &self.outputs
    }

    /// Find an input index by name or position
    pub fn find_input<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<usize> {
        self.prototype.find_input(key)
    }

    /// Find an output index by name or position
    pub fn find_output<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<usize> {
        self.prototype.find_output(key)
    }

    pub(crate) fn resolve_input(&self, key: SocketKey<'_>) -> Result<usize, GraphError> {
        key.resolve(self.prototype.inputs())
            .ok_or_else(|| self.invalid_socket(SocketDirection::Input, key))
    }

    pub(crate) fn resolve_output(&self, key: SocketKey<'_>) -> Result<usize, GraphError> {
        key.resolve(self.prototype.outputs())
            .ok_or_else(|| self.invalid_socket(SocketDirection::Output, key))
    }

    fn invalid_socket(&self, direction: SocketDirection, key: SocketKey<'_>) -> GraphError {
        GraphError::InvalidSocket {
            node: self.name.clone(),
            direction,
            socket: key.to_string(),
        }
    }

    /// Declaration of an input socket
    pub fn input_socket(&self, index: usize) -> Option<&Socket> {
        self.prototype.input(index)
    }

    /// Declaration of an output socket
    pub fn output_socket(&self, index: usize) -> Option<&Socket> {
        self.prototype.output(index)
    }

    /// Explicitly set value of an input
    pub fn input_value<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<&Value> {
        let index = self.find_input(key)?;
        self.inputs[index].value.as_ref()
    }

    /// Explicitly set value of an input, falling back to the declared default
    pub fn input_value_or_default<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<&Value> {
        let index = self.find_input(key)?;
        self.inputs[index]
            .value
            .as_ref()
            .or_else(|| self.prototype.input(index).map(|s| &s.default_value))
    }

    /// Producer feeding an input
    pub fn input_link<'a>(&self, key: impl Into<SocketKey<'a>>) -> Option<SocketHandle> {
        let index = self.find_input(key)?;
        self.inputs[index].link
    }

    /// Whether an input is fed by a link
    pub fn is_input_linked<'a>(&self, key: impl Into<SocketKey<'a>>) -> bool {
        self.input_link(key).is_some()
    }

    /// Consumers of an output
    pub fn output_links<'a>(&self, key: impl Into<SocketKey<'a>>) -> &[SocketHandle] {
        match self.find_output(key) {
            Some(index) => &self.outputs[index].links,
            None => &[],
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{GenerateError, NodeEmitter};
    use crate::node::NodeCategory;
    use crate::value::DataType;

    fn emit_nothing(_: &NodeEmitter<'_>) -> Result<String, GenerateError> {
        Ok(String::new())
    }

    fn node() -> GraphNode {
        let proto = NodePrototype::new("test", NodeCategory::Custom, emit_nothing)
            .with_input(Socket::new("fac", DataType::Float).with_default(0.5f32))
            .with_output(Socket::new("out", DataType::Float));
        GraphNode::new(NodeId::new(), "test1".to_string(), Arc::new(proto))
    }

    #[test]
    fn test_new_node_is_empty() {
        let node = node();
        assert_eq!(node.inputs().len(), 1);
        assert_eq!(node.outputs().len(), 1);
        assert!(node.input_value("fac").is_none());
        assert!(!node.is_input_linked("fac"));
        assert!(node.output_links("out").is_empty());
        assert!(node.index().is_none());
    }

    #[test]
    fn test_value_or_default() {
        let mut node = node();
        assert_eq!(node.input_value_or_default("fac"), Some(&Value::Float(0.5)));
        node.inputs[0].value = Some(Value::Float(2.0));
        assert_eq!(node.input_value_or_default("fac"), Some(&Value::Float(2.0)));
        assert_eq!(node.input_value_or_default("missing"), None);
    }

    #[test]
    fn test_resolve_reports_socket() {
        let node = node();
        let err = node.resolve_output(SocketKey::Name("nope")).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidSocket {
                node: "test1".to_string(),
                direction: SocketDirection::Output,
                socket: "'nope'".to_string(),
            }
        );
    }
}
