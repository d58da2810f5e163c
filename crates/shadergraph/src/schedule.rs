// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topological scheduling of graph nodes.

use crate::graph::Graph;
use crate::graph_node::NodeId;
use std::collections::BTreeSet;
use tracing::debug;

/// Order nodes so that every producer precedes its consumers.
///
/// Kahn's algorithm over producer-to-consumer edges, one edge per link.
/// When several nodes are ready at once, the one earliest in the node list
/// goes first, so the order is fully determined by the graph.
pub fn topological_order(graph: &Graph) -> Result<Vec<NodeId>, CycleError> {
    let total = graph.node_count();
    let mut in_degree = vec![0usize; total];
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); total];

    for (position, node) in graph.nodes().enumerate() {
        for consumer in node.outputs().iter().flat_map(|o| o.links()) {
            let target = graph.position(consumer.node).unwrap_or_else(|| {
                panic!(
                    "broken invariant: '{}' links to node {} outside graph '{}'",
                    node.name(),
                    consumer.node,
                    graph.name
                )
            });
            edges[position].push(target);
            in_degree[target] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..total).filter(|p| in_degree[*p] == 0).collect();
    let mut order = Vec::with_capacity(total);
    while let Some(position) = ready.pop_first() {
        order.push(position);
        for &target in &edges[position] {
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                ready.insert(target);
            }
        }
    }

    if order.len() < total {
        return Err(CycleError {
            graph: graph.name.clone(),
            ordered: order.len(),
            total,
        });
    }

    Ok(order
        .into_iter()
        .filter_map(|p| graph.node_at(p).map(|n| n.id()))
        .collect())
}

impl Graph {
    /// Sort the graph and assign every node its dense schedule index.
    ///
    /// Indices stay valid until the next structural edit.
    pub fn schedule(&mut self) -> Result<Vec<NodeId>, CycleError> {
        let order = topological_order(self)?;
        for (index, id) in order.iter().enumerate() {
            self.nodes[id].index = Some(index);
        }
        self.mark_scheduled();
        debug!(
            graph = %self.name,
            order = ?order
                .iter()
                .map(|id| self.nodes[id].name())
                .collect::<Vec<_>>(),
            "scheduled graph"
        );
        Ok(order)
    }
}

/// Error when graph contains a cycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Graph '{graph}' contains a cycle: only {ordered} of {total} nodes could be ordered")]
pub struct CycleError {
    /// Graph name
    pub graph: String,
    /// Nodes placed before the cycle blocked progress
    pub ordered: usize,
    /// Total node count
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{create_default_registry, math, value};
    use std::sync::Arc;

    fn graph() -> Graph {
        Graph::new("test", Arc::new(create_default_registry()))
    }

    fn position_in(order: &[NodeId], id: NodeId) -> usize {
        order.iter().position(|n| *n == id).unwrap()
    }

    #[test]
    fn test_producers_first() {
        let mut graph = graph();
        // Added consumer-first so list order disagrees with data flow.
        let m2 = graph.add_node("math").unwrap();
        let m1 = graph.add_node("math").unwrap();
        let v = graph.add_node("value").unwrap();
        graph.link(v, value::OUT_VALUE, m1, math::IN_VALUE1).unwrap();
        graph.link(m1, math::OUT_VALUE, m2, math::IN_VALUE1).unwrap();
        graph.link(v, value::OUT_VALUE, m2, math::IN_VALUE2).unwrap();

        let order = topological_order(&graph).unwrap();
        assert_eq!(order.len(), 3);
        for (producer, consumer) in graph.links() {
            assert!(position_in(&order, producer.node) < position_in(&order, consumer.node));
        }
        assert_eq!(order, [v, m1, m2]);
    }

    #[test]
    fn test_ties_follow_list_order() {
        let mut graph = graph();
        let a = graph.add_node("value").unwrap();
        let b = graph.add_node("value").unwrap();
        let c = graph.add_node("value").unwrap();
        assert_eq!(topological_order(&graph).unwrap(), [a, b, c]);
    }

    #[test]
    fn test_direct_cycle() {
        let mut graph = graph();
        let a = graph.add_node("math").unwrap();
        let b = graph.add_node("math").unwrap();
        graph.link(a, math::OUT_VALUE, b, math::IN_VALUE1).unwrap();
        graph.link(b, math::OUT_VALUE, a, math::IN_VALUE1).unwrap();

        let err = topological_order(&graph).unwrap_err();
        assert_eq!(
            err,
            CycleError {
                graph: "test".to_string(),
                ordered: 0,
                total: 2
            }
        );
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        let mut graph = graph();
        let v = graph.add_node("value").unwrap();
        let a = graph.add_node("math").unwrap();
        let b = graph.add_node("math").unwrap();
        graph.link(v, value::OUT_VALUE, a, math::IN_VALUE2).unwrap();
        graph.link(a, math::OUT_VALUE, b, math::IN_VALUE1).unwrap();
        graph.link(b, math::OUT_VALUE, a, math::IN_VALUE1).unwrap();

        let err = topological_order(&graph).unwrap_err();
        assert_eq!(err.ordered, 1);
        assert_eq!(err.total, 3);
    }

    #[test]
    fn test_schedule_assigns_indices() {
        let mut graph = graph();
        let m = graph.add_node("math").unwrap();
        let v = graph.add_node("value").unwrap();
        graph.link(v, value::OUT_VALUE, m, math::IN_VALUE1).unwrap();

        graph.schedule().unwrap();
        assert_eq!(graph.node(v).unwrap().index(), Some(0));
        assert_eq!(graph.node(m).unwrap().index(), Some(1));

        graph.add_node("value").unwrap();
        assert_eq!(graph.node(v).unwrap().index(), None);
    }

    #[test]
    fn test_empty_graph() {
        assert!(topological_order(&graph()).unwrap().is_empty());
    }
}
