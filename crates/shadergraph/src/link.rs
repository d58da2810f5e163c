// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link management between node sockets.
//!
//! Every operation validates before it mutates, so a failed call leaves the
//! graph untouched. Forward links (output to inputs) and back links (input
//! to output) are always updated together.

use crate::graph::{Graph, GraphError};
use crate::graph_node::{NodeId, SocketHandle};
use crate::socket::SocketKey;
use tracing::debug;

impl Graph {
    /// Check whether an output may feed an input.
    ///
    /// Self-links are rejected. Socket data types are not compared; a link
    /// between differing kinds passes the producer's variable through as is.
    pub fn can_link(
        &self,
        from: NodeId,
        output: usize,
        to: NodeId,
        input: usize,
    ) -> Result<(), GraphError> {
        let producer = self.node_or_err(from)?;
        let consumer = self.node_or_err(to)?;
        producer.resolve_output(SocketKey::Index(output))?;
        consumer.resolve_input(SocketKey::Index(input))?;
        if from == to {
            return Err(GraphError::IncompatibleLink {
                from: producer.name().to_string(),
                to: consumer.name().to_string(),
                reason: "a node cannot link to itself".to_string(),
            });
        }
        Ok(())
    }

    /// Link an output to an input.
    ///
    /// An input has at most one producer: any existing link into `input` is
    /// broken first.
    pub fn link<'a, 'b>(
        &mut self,
        from: NodeId,
        output: impl Into<SocketKey<'a>>,
        to: NodeId,
        input: impl Into<SocketKey<'b>>,
    ) -> Result<(), GraphError> {
        let output = self.node_or_err(from)?.resolve_output(output.into())?;
        let input = self.node_or_err(to)?.resolve_input(input.into())?;
        self.can_link(from, output, to, input)?;
        self.connect(SocketHandle::new(from, output), SocketHandle::new(to, input));
        Ok(())
    }

    fn connect(&mut self, producer: SocketHandle, consumer: SocketHandle) {
        self.break_input_link(consumer);
        self.nodes[&producer.node].outputs[producer.socket]
            .links
            .push(consumer);
        self.nodes[&consumer.node].inputs[consumer.socket].link = Some(producer);
        self.invalidate_schedule();
        debug!(
            from = self.nodes[&producer.node].name(),
            output = producer.socket,
            to = self.nodes[&consumer.node].name(),
            input = consumer.socket,
            "linked"
        );
    }

    /// Remove the link into `consumer`, returning its former producer
    fn break_input_link(&mut self, consumer: SocketHandle) -> Option<SocketHandle> {
        let producer = self.nodes[&consumer.node].inputs[consumer.socket].link.take()?;
        let links = &mut self.nodes[&producer.node].outputs[producer.socket].links;
        let position = links.iter().position(|h| *h == consumer).unwrap_or_else(|| {
            panic!("broken invariant: back link without forward link into {consumer:?}")
        });
        links.remove(position);
        self.invalidate_schedule();
        Some(producer)
    }

    /// Break the link into an input; returns whether one existed
    pub fn disconnect_input<'a>(
        &mut self,
        node: NodeId,
        input: impl Into<SocketKey<'a>>,
    ) -> Result<bool, GraphError> {
        let input = self.node_or_err(node)?.resolve_input(input.into())?;
        Ok(self
            .break_input_link(SocketHandle::new(node, input))
            .is_some())
    }

    /// Break one specific link; returns whether it existed
    pub fn disconnect<'a, 'b>(
        &mut self,
        from: NodeId,
        output: impl Into<SocketKey<'a>>,
        to: NodeId,
        input: impl Into<SocketKey<'b>>,
    ) -> Result<bool, GraphError> {
        let output = self.node_or_err(from)?.resolve_output(output.into())?;
        let input = self.node_or_err(to)?.resolve_input(input.into())?;
        let consumer = SocketHandle::new(to, input);
        if self.nodes[&to].inputs[input].link != Some(SocketHandle::new(from, output)) {
            return Ok(false);
        }
        self.break_input_link(consumer);
        Ok(true)
    }

    /// Break every link leaving a node; returns how many were removed
    pub fn disconnect_outputs(&mut self, node: NodeId) -> usize {
        let Some(graph_node) = self.nodes.get(&node) else {
            return 0;
        };
        let consumers: Vec<SocketHandle> = graph_node
            .outputs
            .iter()
            .flat_map(|o| o.links.iter().copied())
            .collect();
        for consumer in &consumers {
            self.break_input_link(*consumer);
        }
        consumers.len()
    }

    /// Break every link entering a node; returns how many were removed
    pub fn disconnect_inputs(&mut self, node: NodeId) -> usize {
        let Some(graph_node) = self.nodes.get(&node) else {
            return 0;
        };
        let count = graph_node.inputs.len();
        (0..count)
            .filter(|i| self.break_input_link(SocketHandle::new(node, *i)).is_some())
            .count()
    }

    /// Break every link touching a node
    pub fn disconnect_all(&mut self, node: NodeId) -> usize {
        self.disconnect_inputs(node) + self.disconnect_outputs(node)
    }

    /// Move every consumer of one output onto another node's output.
    ///
    /// Both outputs must carry the same data type. Returns the number of
    /// links moved.
    pub fn relink<'a, 'b>(
        &mut self,
        node: NodeId,
        output: impl Into<SocketKey<'a>>,
        new_node: NodeId,
        new_output: impl Into<SocketKey<'b>>,
    ) -> Result<usize, GraphError> {
        let source = self.node_or_err(node)?;
        let target = self.node_or_err(new_node)?;
        let output = source.resolve_output(output.into())?;
        let new_output = target.resolve_output(new_output.into())?;

        let expected = source.prototype().outputs()[output].data_type;
        let found = target.prototype().outputs()[new_output].data_type;
        if expected != found {
            return Err(GraphError::TypeMismatch { expected, found });
        }

        let consumers = source.outputs[output].links.clone();
        if node == new_node && output == new_output {
            return Ok(consumers.len());
        }
        for consumer in &consumers {
            self.can_link(new_node, new_output, consumer.node, consumer.socket)?;
        }

        let producer = SocketHandle::new(new_node, new_output);
        for consumer in &consumers {
            self.connect(producer, *consumer);
        }
        debug!(
            node = self.nodes[&node].name(),
            new_node = self.nodes[&new_node].name(),
            moved = consumers.len(),
            "relinked output"
        );
        Ok(consumers.len())
    }

    /// Give another node's input the same source as one of this node's inputs.
    ///
    /// A linked input links its producer to the target input as well; an
    /// input holding a stored value copies that value. Returns `false`
    /// without changes when the source input is neither linked nor set.
    pub fn propagate_input<'a, 'b>(
        &mut self,
        node: NodeId,
        input: impl Into<SocketKey<'a>>,
        target: NodeId,
        target_input: impl Into<SocketKey<'b>>,
    ) -> Result<bool, GraphError> {
        let source = self.node_or_err(node)?;
        let dest = self.node_or_err(target)?;
        let input = source.resolve_input(input.into())?;
        let target_input = dest.resolve_input(target_input.into())?;

        let expected = dest.prototype().inputs()[target_input].data_type;
        let found = source.prototype().inputs()[input].data_type;
        if expected != found {
            return Err(GraphError::TypeMismatch { expected, found });
        }

        let state = source.inputs[input].clone();
        if let Some(producer) = state.link {
            self.can_link(producer.node, producer.socket, target, target_input)?;
            self.connect(producer, SocketHandle::new(target, target_input));
            Ok(true)
        } else if let Some(value) = state.value {
            let dest = &mut self.nodes[&target];
            dest.prototype().inputs()[target_input].check_value(&value)?;
            dest.inputs[target_input].value = Some(value);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
