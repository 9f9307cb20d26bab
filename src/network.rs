use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::account_id::AccountId;
use crate::amount::Amount;
use crate::error::Error;
use crate::node::FlowNode;

/// Lifecycle of a residual network with respect to the max-flow solver.
///
/// The solver is not idempotent: a second run would treat residual
/// capacities as fresh ones and report additional flow, so a solved network
/// can only be read, never solved again.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GraphState {
    Fresh,
    Solved,
}

/// Identity of the trust relation an expanded edge stands in for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Provenance<Id, Amt> {
    pub from: Id,
    pub to: Id,
    pub token: Id,
    pub trust_capacity: Amt,
}

/// An edge of the residual graph.
///
/// Tracks the flow sent over it so far; the remaining capacities in both
/// directions derive from it. At construction the whole capacity is still
/// available and the flow is zero.
#[derive(Clone, Debug)]
pub struct FlowEdge<Id, Amt> {
    from: NodeIndex,
    to: NodeIndex,
    capacity: Amt,
    flow: Amt,
    provenance: Option<Provenance<Id, Amt>>,
}

impl<Id, Amt> FlowEdge<Id, Amt>
where
    Amt: Amount,
{
    fn new(
        from: NodeIndex,
        to: NodeIndex,
        capacity: Amt,
        provenance: Option<Provenance<Id, Amt>>,
    ) -> Self {
        Self {
            from,
            to,
            capacity,
            flow: Amt::zero(),
            provenance,
        }
    }

    pub fn from_node(&self) -> NodeIndex {
        self.from
    }

    pub fn to_node(&self) -> NodeIndex {
        self.to
    }

    pub fn other_node(&self, node: NodeIndex) -> NodeIndex {
        if node == self.from {
            self.to
        } else {
            self.from
        }
    }

    pub fn capacity(&self) -> Amt {
        self.capacity
    }

    pub fn flow(&self) -> Amt {
        self.flow
    }

    pub fn provenance(&self) -> Option<&Provenance<Id, Amt>> {
        self.provenance.as_ref()
    }

    /// Remaining capacity towards `node`: room to push forward when `node`
    /// is the head of the edge, flow available to cancel when it is the
    /// tail.
    pub fn residual_capacity_to(&self, node: NodeIndex) -> Result<Amt, Error> {
        if node == self.from {
            Ok(self.flow)
        } else if node == self.to {
            Ok(self.capacity - self.flow)
        } else {
            Err(Error::InvalidEndpoint)
        }
    }

    /// Sends `delta` towards `node`: forward flow when `node` is the head,
    /// cancellation when it is the tail.
    pub fn add_residual_flow_to(&mut self, node: NodeIndex, delta: Amt) -> Result<(), Error> {
        if node == self.from {
            self.flow = self.flow.checked_sub(&delta).ok_or(Error::Overflow)?;
        } else if node == self.to {
            self.flow = self.flow.checked_add(&delta).ok_or(Error::Overflow)?;
        } else {
            return Err(Error::InvalidEndpoint);
        }
        Ok(())
    }
}

/// The expanded flow network the solver runs on.
///
/// Nodes are interned exactly once; parallel edges stay distinct so every
/// input trust relation keeps its own provenance.
#[derive(Debug)]
pub struct ResidualNetwork<Id, Amt> {
    graph: DiGraph<FlowNode<Id>, FlowEdge<Id, Amt>>,
    indices: BTreeMap<FlowNode<Id>, NodeIndex>,
    state: GraphState,
}

impl<Id, Amt> ResidualNetwork<Id, Amt>
where
    Id: AccountId,
    Amt: Amount,
{
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            indices: BTreeMap::new(),
            state: GraphState::Fresh,
        }
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub(crate) fn mark_solved(&mut self) {
        self.state = GraphState::Solved;
    }

    /// Interns `node`, returning the existing index on a repeat insert.
    pub fn add_node(&mut self, node: FlowNode<Id>) -> NodeIndex {
        if let Some(index) = self.indices.get(&node) {
            return *index;
        }
        let index = self.graph.add_node(node.clone());
        self.indices.insert(node, index);
        index
    }

    pub fn node_index(&self, node: &FlowNode<Id>) -> Option<NodeIndex> {
        self.indices.get(node).copied()
    }

    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Amt,
        provenance: Option<Provenance<Id, Amt>>,
    ) -> Result<EdgeIndex, Error> {
        if from == to {
            return Err(Error::SelfLoop(self.graph[from].to_string()));
        }
        if capacity < Amt::zero() {
            return Err(Error::NegativeCapacity);
        }
        Ok(self
            .graph
            .add_edge(from, to, FlowEdge::new(from, to, capacity, provenance)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge(&self, edge: EdgeIndex) -> &FlowEdge<Id, Amt> {
        &self.graph[edge]
    }

    pub(crate) fn edge_mut(&mut self, edge: EdgeIndex) -> &mut FlowEdge<Id, Amt> {
        &mut self.graph[edge]
    }

    /// All edges incident to `node`, outgoing and incoming; the residual
    /// capacity towards the far endpoint decides which of them a search may
    /// cross.
    pub fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .chain(self.graph.edges_directed(node, Direction::Incoming))
            .map(|edge| edge.id())
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge<Id, Amt>> {
        self.graph.edge_weights()
    }
}

impl<Id, Amt> Default for ResidualNetwork<Id, Amt>
where
    Id: AccountId,
    Amt: Amount,
{
    fn default() -> Self {
        Self::new()
    }
}
