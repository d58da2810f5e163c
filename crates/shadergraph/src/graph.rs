// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure owning node instances.
//!
//! Nodes are stored in insertion order; a node's position in that order is
//! its list position, and removal shifts later nodes down by one. Links are
//! stored on the sockets themselves as [`SocketHandle`]s, so cloning a graph
//! yields a self-contained copy whose handles resolve into the copy.

use crate::graph_node::{GraphNode, NodeId, SocketHandle};
use crate::node::{NodePrototype, NodeRegistry};
use crate::socket::{SocketDirection, SocketKey};
use crate::value::{DataType, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A shader node graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    registry: Arc<NodeRegistry>,
    pub(crate) nodes: IndexMap<NodeId, GraphNode>,
    names: HashMap<String, NodeId>,
    scheduled: bool,
}

impl Graph {
    /// Create a new empty graph bound to a registry
    pub fn new(name: impl Into<String>, registry: Arc<NodeRegistry>) -> Self {
        Self {
            name: name.into(),
            registry,
            nodes: IndexMap::new(),
            names: HashMap::new(),
            scheduled: false,
        }
    }

    /// Registry this graph creates nodes from
    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Add a node of the given type, named after the type plus the
    /// smallest unused numeric suffix (`math1`, `math2`, ...)
    pub fn add_node(&mut self, type_name: &str) -> Result<NodeId, GraphError> {
        let prototype = self.prototype(type_name)?;
        let name = self.unique_name(type_name);
        Ok(self.insert_node(prototype, name))
    }

    /// Add a node with an explicit display name
    pub fn add_node_named(
        &mut self,
        type_name: &str,
        name: impl Into<String>,
    ) -> Result<NodeId, GraphError> {
        let prototype = self.prototype(type_name)?;
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateName(name));
        }
        Ok(self.insert_node(prototype, name))
    }

    fn prototype(&self, type_name: &str) -> Result<Arc<NodePrototype>, GraphError> {
        self.registry
            .get(type_name)
            .ok_or_else(|| GraphError::UnknownNodeType(type_name.to_string()))
    }

    fn unique_name(&self, base: &str) -> String {
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.names.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn insert_node(&mut self, prototype: Arc<NodePrototype>, name: String) -> NodeId {
        let id = NodeId::new();
        debug!(node = %name, node_type = prototype.type_name(), "adding node");
        self.names.insert(name.clone(), id);
        self.nodes.insert(id, GraphNode::new(id, name, prototype));
        self.invalidate_schedule();
        id
    }

    /// Remove a node by name, breaking every link that touches it
    pub fn remove_node(&mut self, name: &str) -> Option<GraphNode> {
        let id = *self.names.get(name)?;
        self.disconnect_all(id);
        let node = self.nodes.shift_remove(&id)?;
        self.names.remove(name);
        self.assert_no_links_into(id);
        self.invalidate_schedule();
        debug!(node = name, "removed node");
        Some(node)
    }

    /// Give a node a new display name
    pub fn rename_node(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), GraphError> {
        let name = name.into();
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.name() == name {
            return Ok(());
        }
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateName(name));
        }
        self.names.remove(node.name());
        self.names.insert(name.clone(), id);
        node.set_name(name);
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Get a node by display name
    pub fn node_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.find_node(name).and_then(|id| self.node(id))
    }

    /// Look up a node's ID by display name
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Get all nodes in list order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Get all node IDs in list order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Position of a node in the node list
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    /// Node at a list position
    pub fn node_at(&self, position: usize) -> Option<&GraphNode> {
        self.nodes.get_index(position).map(|(_, node)| node)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node_or_err(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Every link in the graph as `(producer, consumer)` pairs, ordered by
    /// producer list position, output index and link order
    pub fn links(&self) -> Vec<(SocketHandle, SocketHandle)> {
        self.nodes
            .values()
            .flat_map(|node| {
                node.outputs.iter().enumerate().flat_map(move |(i, output)| {
                    output
                        .links
                        .iter()
                        .map(move |consumer| (SocketHandle::new(node.id(), i), *consumer))
                })
            })
            .collect()
    }

    /// Store a literal value on an input.
    ///
    /// An existing link is kept and still takes precedence during code
    /// generation; the value applies again once the link is removed.
    pub fn set_input_value<'a>(
        &mut self,
        id: NodeId,
        input: impl Into<SocketKey<'a>>,
        value: impl Into<Value>,
    ) -> Result<(), GraphError> {
        let value = value.into();
        let node = self.node_or_err(id)?;
        let index = node.resolve_input(input.into())?;
        if let Some(socket) = node.input_socket(index) {
            socket.check_value(&value)?;
        }
        self.nodes[&id].inputs[index].value = Some(value);
        Ok(())
    }

    /// Forget an input's stored value; returns whether one was set
    pub fn clear_input_value<'a>(
        &mut self,
        id: NodeId,
        input: impl Into<SocketKey<'a>>,
    ) -> Result<bool, GraphError> {
        let index = self.node_or_err(id)?.resolve_input(input.into())?;
        Ok(self.nodes[&id].inputs[index].value.take().is_some())
    }

    /// Copy every node of `other` into this graph.
    ///
    /// Each copied node gets a fresh ID; its display name is kept unless it
    /// is already taken, in which case it is renamed after its type. Links
    /// between copied nodes are remapped onto the copies. Returns the
    /// old-to-new ID table.
    ///
    /// # Panics
    ///
    /// Panics if `other` holds a link to a node it does not contain.
    pub fn merge(&mut self, other: &Graph) -> HashMap<NodeId, NodeId> {
        let mut remap = HashMap::with_capacity(other.node_count());
        for node in other.nodes() {
            let name = if self.names.contains_key(node.name()) {
                self.unique_name(node.type_name())
            } else {
                node.name().to_string()
            };
            let id = self.insert_node(node.prototype().clone(), name);
            remap.insert(node.id(), id);
        }

        let resolve = |handle: SocketHandle| -> SocketHandle {
            let node = *remap.get(&handle.node).unwrap_or_else(|| {
                panic!(
                    "broken invariant: link endpoint {} missing from graph '{}'",
                    handle.node, other.name
                )
            });
            SocketHandle::new(node, handle.socket)
        };

        for source in other.nodes() {
            let target = &mut self.nodes[&remap[&source.id()]];
            for (dst, src) in target.inputs.iter_mut().zip(&source.inputs) {
                dst.value = src.value.clone();
                dst.link = src.link.map(resolve);
            }
            for (dst, src) in target.outputs.iter_mut().zip(&source.outputs) {
                dst.links = src.links.iter().copied().map(resolve).collect();
            }
        }
        debug!(
            graph = %self.name,
            source = %other.name,
            nodes = remap.len(),
            "merged graph"
        );
        remap
    }

    /// Whether every forward link has a matching back link and vice versa
    pub fn links_consistent(&self) -> bool {
        self.nodes.values().all(|node| {
            let inputs_ok = node.inputs.iter().enumerate().all(|(i, input)| {
                input.link.map_or(true, |producer| {
                    self.nodes
                        .get(&producer.node)
                        .and_then(|n| n.outputs.get(producer.socket))
                        .is_some_and(|o| o.links.contains(&SocketHandle::new(node.id(), i)))
                })
            });
            let outputs_ok = node.outputs.iter().enumerate().all(|(i, output)| {
                output.links.iter().all(|consumer| {
                    self.nodes
                        .get(&consumer.node)
                        .and_then(|n| n.inputs.get(consumer.socket))
                        .is_some_and(|input| input.link == Some(SocketHandle::new(node.id(), i)))
                })
            });
            inputs_ok && outputs_ok
        })
    }

    fn assert_no_links_into(&self, removed: NodeId) {
        for node in self.nodes.values() {
            let dangling = node
                .inputs
                .iter()
                .filter_map(|i| i.link)
                .chain(node.outputs.iter().flat_map(|o| o.links.iter().copied()))
                .any(|handle| handle.node == removed);
            assert!(
                !dangling,
                "broken invariant: node '{}' still links to removed node {removed}",
                node.name()
            );
        }
    }

    pub(crate) fn invalidate_schedule(&mut self) {
        if self.scheduled {
            for node in self.nodes.values_mut() {
                node.index = None;
            }
            self.scheduled = false;
        }
    }

    pub(crate) fn mark_scheduled(&mut self) {
        self.scheduled = true;
    }
}

/// Error from a structural graph operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// No prototype registered under the name
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Socket name or index does not exist on the node
    #[error("Node '{node}' has no {direction} socket {socket}")]
    InvalidSocket {
        /// Node display name
        node: String,
        /// Which socket list was searched
        direction: SocketDirection,
        /// Requested name or index
        socket: String,
    },

    /// The link was rejected
    #[error("Cannot link '{from}' to '{to}': {reason}")]
    IncompatibleLink {
        /// Producer display name
        from: String,
        /// Consumer display name
        to: String,
        /// Why the link was rejected
        reason: String,
    },

    /// Socket data types differ
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the socket declares
        expected: DataType,
        /// Type that was supplied
        found: DataType,
    },

    /// Enum value outside the socket's domain
    #[error("Value {value} is not in the domain of socket '{socket}'")]
    InvalidEnumValue {
        /// Socket name
        socket: String,
        /// Raw value supplied
        value: i32,
    },

    /// Display name already used in this graph
    #[error("Duplicate node name: {0}")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{create_default_registry, math, value};

    fn graph() -> Graph {
        Graph::new("test", Arc::new(create_default_registry()))
    }

    #[test]
    fn test_auto_naming() {
        let mut graph = graph();
        let a = graph.add_node("math").unwrap();
        let b = graph.add_node("math").unwrap();
        assert_eq!(graph.node(a).unwrap().name(), "math1");
        assert_eq!(graph.node(b).unwrap().name(), "math2");

        graph.remove_node("math1").unwrap();
        let c = graph.add_node("math").unwrap();
        assert_eq!(graph.node(c).unwrap().name(), "math1");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_unknown_type() {
        let mut graph = graph();
        assert_eq!(
            graph.add_node("nope"),
            Err(GraphError::UnknownNodeType("nope".to_string()))
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_duplicate_name() {
        let mut graph = graph();
        graph.add_node_named("value", "base").unwrap();
        assert_eq!(
            graph.add_node_named("math", "base"),
            Err(GraphError::DuplicateName("base".to_string()))
        );
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut graph = graph();
        let a = graph.add_node("value").unwrap();
        let b = graph.add_node("value").unwrap();
        let c = graph.add_node("value").unwrap();
        assert_eq!(graph.position(c), Some(2));

        assert!(graph.remove_node("value1").is_some());
        assert_eq!(graph.position(a), None);
        assert_eq!(graph.position(b), Some(0));
        assert_eq!(graph.position(c), Some(1));
        assert!(graph.find_node("value1").is_none());
        assert!(graph.remove_node("value1").is_none());
    }

    #[test]
    fn test_remove_breaks_links() {
        let mut graph = graph();
        let a = graph.add_node("value").unwrap();
        let b = graph.add_node("math").unwrap();
        let c = graph.add_node("math").unwrap();
        graph.link(a, value::OUT_VALUE, b, math::IN_VALUE1).unwrap();
        graph.link(b, math::OUT_VALUE, c, math::IN_VALUE1).unwrap();

        graph.remove_node("math1").unwrap();
        assert!(graph.node(a).unwrap().output_links(value::OUT_VALUE).is_empty());
        assert!(!graph.node(c).unwrap().is_input_linked(math::IN_VALUE1));
        assert!(graph.links().is_empty());
        assert!(graph.links_consistent());
    }

    #[test]
    fn test_set_value_checks_type() {
        let mut graph = graph();
        let m = graph.add_node("math").unwrap();
        graph.set_input_value(m, math::IN_VALUE1, 2.5f32).unwrap();
        assert_eq!(
            graph.node(m).unwrap().input_value(math::IN_VALUE1),
            Some(&Value::Float(2.5))
        );
        assert_eq!(
            graph.set_input_value(m, math::IN_VALUE1, true),
            Err(GraphError::TypeMismatch {
                expected: DataType::Float,
                found: DataType::Boolean
            })
        );
        assert!(matches!(
            graph.set_input_value(m, "nope", 1.0f32),
            Err(GraphError::InvalidSocket { .. })
        ));
        assert_eq!(graph.clear_input_value(m, math::IN_VALUE1), Ok(true));
        assert_eq!(graph.clear_input_value(m, math::IN_VALUE1), Ok(false));
    }

    #[test]
    fn test_rename() {
        let mut graph = graph();
        let a = graph.add_node("value").unwrap();
        graph.add_node("value").unwrap();
        assert_eq!(
            graph.rename_node(a, "value2"),
            Err(GraphError::DuplicateName("value2".to_string()))
        );
        graph.rename_node(a, "base").unwrap();
        assert_eq!(graph.find_node("base"), Some(a));
        assert!(graph.find_node("value1").is_none());
        let b = graph.add_node("value").unwrap();
        assert_eq!(graph.node(b).unwrap().name(), "value1");
    }

    #[test]
    fn test_clone_isolation() {
        let mut original = graph();
        let a = original.add_node("value").unwrap();
        let b = original.add_node("math").unwrap();
        original.link(a, value::OUT_VALUE, b, math::IN_VALUE1).unwrap();

        let mut copy = original.clone();
        copy.remove_node("value1").unwrap();
        let c = copy.add_node("math").unwrap();
        copy.link(b, math::OUT_VALUE, c, math::IN_VALUE2).unwrap();

        assert_eq!(original.node_count(), 2);
        assert_eq!(
            original.nodes().map(GraphNode::name).collect::<Vec<_>>(),
            ["value1", "math1"]
        );
        assert_eq!(original.links().len(), 1);
        assert_eq!(
            original.node(b).unwrap().input_link(math::IN_VALUE1),
            Some(SocketHandle::new(a, 0))
        );
        assert!(original.node(b).unwrap().output_links(math::OUT_VALUE).is_empty());
        assert!(original.links_consistent());
        assert!(copy.links_consistent());
    }

    #[test]
    fn test_merge_remaps_links() {
        let mut source = graph();
        let a = source.add_node("value").unwrap();
        let b = source.add_node("math").unwrap();
        source.set_input_value(a, value::IN_VALUE, 3.0f32).unwrap();
        source.link(a, value::OUT_VALUE, b, math::IN_VALUE1).unwrap();

        let mut dest = graph();
        dest.add_node("value").unwrap();
        let remap = dest.merge(&source);

        assert_eq!(dest.node_count(), 3);
        let new_a = remap[&a];
        let new_b = remap[&b];
        assert_ne!(new_a, a);
        // "value1" was taken in the destination
        assert_eq!(dest.node(new_a).unwrap().name(), "value2");
        assert_eq!(dest.node(new_b).unwrap().name(), "math1");
        assert_eq!(
            dest.node(new_b).unwrap().input_link(math::IN_VALUE1),
            Some(SocketHandle::new(new_a, 0))
        );
        assert_eq!(
            dest.node(new_a).unwrap().input_value(value::IN_VALUE),
            Some(&Value::Float(3.0))
        );
        assert!(dest.links_consistent());
        assert!(dest.links().iter().all(|(p, c)| p.node != a && c.node != b));
    }

    #[test]
    #[should_panic(expected = "broken invariant")]
    fn test_merge_rejects_dangling_link() {
        let mut source = graph();
        let a = source.add_node("value").unwrap();
        let b = source.add_node("math").unwrap();
        source.link(a, value::OUT_VALUE, b, math::IN_VALUE1).unwrap();
        // Corrupt the source: drop the producer without unlinking.
        source.nodes.shift_remove(&a);

        let mut dest = graph();
        dest.merge(&source);
    }
}
