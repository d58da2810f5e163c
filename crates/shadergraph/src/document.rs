// SPDX-License-Identifier: MIT OR Apache-2.0
//! RON persistence for graphs.
//!
//! Documents reference nodes and sockets by name, so they survive
//! regenerated node IDs and reordered socket lists.

use crate::graph::{Graph, GraphError};
use crate::node::NodeRegistry;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Serialized form of a [`Graph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Graph name
    pub name: String,
    /// Nodes in node-list order
    pub nodes: Vec<NodeDocument>,
}

fn default_version() -> u32 {
    DOCUMENT_FORMAT_VERSION
}

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    /// Display name
    pub name: String,
    /// Prototype type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicitly set input values by input name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, Value>,
    /// Incoming links by input name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, LinkDocument>,
}

/// Producer end of an incoming link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDocument {
    /// Producer display name
    pub node: String,
    /// Producer output name
    pub output: String,
}

impl GraphDocument {
    /// Capture a graph
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| {
                let proto = node.prototype();
                let mut values = IndexMap::new();
                let mut links = IndexMap::new();
                for (socket, state) in proto.inputs().iter().zip(node.inputs()) {
                    if let Some(value) = state.value() {
                        values.insert(socket.name.clone(), value.clone());
                    }
                    if let Some(producer) = state.link() {
                        let producer = graph.node(producer.node).and_then(|p| {
                            p.output_socket(producer.socket)
                                .map(|out| (p.name().to_string(), out.name.clone()))
                        });
                        let (node_name, output) = producer.unwrap_or_else(|| {
                            panic!(
                                "broken invariant: input '{}' of '{}' links outside the graph",
                                socket.name,
                                node.name()
                            )
                        });
                        links.insert(
                            socket.name.clone(),
                            LinkDocument {
                                node: node_name,
                                output,
                            },
                        );
                    }
                }
                NodeDocument {
                    name: node.name().to_string(),
                    type_name: node.type_name().to_string(),
                    values,
                    links,
                }
            })
            .collect();

        Self {
            version: DOCUMENT_FORMAT_VERSION,
            name: graph.name.clone(),
            nodes,
        }
    }

    /// Rebuild the graph against a registry.
    ///
    /// Any failure aborts the whole load; no partial graph is returned.
    pub fn into_graph(self, registry: Arc<NodeRegistry>) -> Result<Graph, DocumentError> {
        let result = self.build(registry);
        if let Err(err) = &result {
            warn!(error = %err, "failed to load graph document");
        }
        result
    }

    fn build(self, registry: Arc<NodeRegistry>) -> Result<Graph, DocumentError> {
        if self.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version,
                supported: DOCUMENT_FORMAT_VERSION,
            });
        }

        let mut graph = Graph::new(self.name, registry);
        let mut ids = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            ids.push(graph.add_node_named(&node.type_name, node.name.as_str())?);
        }

        for (node, &id) in self.nodes.iter().zip(&ids) {
            for (input, value) in &node.values {
                graph.set_input_value(id, input, value.clone())?;
            }
        }

        for (node, &id) in self.nodes.iter().zip(&ids) {
            for (input, link) in &node.links {
                let producer = graph
                    .find_node(&link.node)
                    .ok_or_else(|| DocumentError::UnknownNode(link.node.clone()))?;
                graph.link(producer, &link.output, id, input)?;
            }
        }

        debug!(graph = %graph.name, nodes = graph.node_count(), "loaded graph document");
        Ok(graph)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, DocumentError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse from RON
    pub fn from_ron(text: &str) -> Result<Self, DocumentError> {
        Ok(ron::from_str(text)?)
    }
}

/// Error while reading or writing a graph document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Malformed RON
    #[error("Failed to parse graph document: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failure
    #[error("Failed to serialize graph document: {0}")]
    Serialize(#[from] ron::Error),

    /// Document written by a newer format
    #[error("Graph document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the document
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// A link names a node that does not exist
    #[error("Link references unknown node '{0}'")]
    UnknownNode(String),

    /// Rejected by the graph
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{create_default_registry, map_range, math, value};

    fn registry() -> Arc<NodeRegistry> {
        Arc::new(create_default_registry())
    }

    fn sample() -> Graph {
        let mut graph = Graph::new("sample", registry());
        let v = graph.add_node(value::TYPE).unwrap();
        let r = graph.add_node(map_range::TYPE).unwrap();
        let m = graph.add_node_named(math::TYPE, "combine").unwrap();
        graph.set_input_value(v, value::IN_VALUE, 0.75f32).unwrap();
        graph.set_input_value(r, map_range::IN_CLAMP, true).unwrap();
        graph.set_input_value(m, math::IN_VALUE2, 3.0f32).unwrap();
        graph.link(v, value::OUT_VALUE, r, map_range::IN_VALUE).unwrap();
        graph.link(r, map_range::OUT_RESULT, m, math::IN_VALUE1).unwrap();
        graph
    }

    #[test]
    fn test_round_trip() {
        let graph = sample();
        let text = GraphDocument::from_graph(&graph).to_ron().unwrap();
        let loaded = GraphDocument::from_ron(&text)
            .unwrap()
            .into_graph(registry())
            .unwrap();

        assert_eq!(loaded.name, "sample");
        assert_eq!(
            loaded.nodes().map(|n| n.name()).collect::<Vec<_>>(),
            ["value1", "map_range1", "combine"]
        );
        assert_eq!(loaded.links().len(), 2);
        assert_eq!(
            loaded.generate_code().unwrap(),
            graph.generate_code().unwrap()
        );
    }

    #[test]
    fn test_document_shape() {
        let doc = GraphDocument::from_graph(&sample());
        let combine = &doc.nodes[2];
        assert_eq!(combine.type_name, "math");
        assert_eq!(combine.values.get(math::IN_VALUE2), Some(&Value::Float(3.0)));
        assert_eq!(
            combine.links.get(math::IN_VALUE1),
            Some(&LinkDocument {
                node: "map_range1".to_string(),
                output: map_range::OUT_RESULT.to_string(),
            })
        );
        assert!(doc.nodes[0].links.is_empty());
    }

    #[test]
    fn test_duplicate_name_aborts_load() {
        let mut doc = GraphDocument::from_graph(&sample());
        doc.nodes[2].name = "value1".to_string();
        assert!(matches!(
            doc.into_graph(registry()),
            Err(DocumentError::Graph(GraphError::DuplicateName(name))) if name == "value1"
        ));
    }

    #[test]
    fn test_unknown_references() {
        let mut doc = GraphDocument::from_graph(&sample());
        doc.nodes[2].links.get_mut(math::IN_VALUE1).unwrap().node = "ghost".to_string();
        assert!(matches!(
            doc.into_graph(registry()),
            Err(DocumentError::UnknownNode(name)) if name == "ghost"
        ));

        let mut doc = GraphDocument::from_graph(&sample());
        doc.nodes[1].type_name = "teapot".to_string();
        assert!(matches!(
            doc.into_graph(registry()),
            Err(DocumentError::Graph(GraphError::UnknownNodeType(_)))
        ));

        let mut doc = GraphDocument::from_graph(&sample());
        doc.nodes[0].values.insert("nope".to_string(), Value::Float(1.0));
        assert!(matches!(
            doc.into_graph(registry()),
            Err(DocumentError::Graph(GraphError::InvalidSocket { .. }))
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut doc = GraphDocument::from_graph(&sample());
        doc.version = DOCUMENT_FORMAT_VERSION + 1;
        assert!(matches!(
            doc.into_graph(registry()),
            Err(DocumentError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            GraphDocument::from_ron("(name: "),
            Err(DocumentError::Parse(_))
        ));
    }
}
