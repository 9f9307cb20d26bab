use core::cmp::min;
use core::marker::PhantomData;
use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::account_id::AccountId;
use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{GraphState, ResidualNetwork};

/// Edmonds-Karp: Ford-Fulkerson with breadth-first augmenting-path search,
/// O(V * E^2). Trust networks stay far below the sizes where that bound
/// hurts.
pub struct EdmondsKarp<Id, Amt>(PhantomData<(Id, Amt)>);

impl<Id, Amt> Default for EdmondsKarp<Id, Amt> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<Id, Amt> MaxFlow for EdmondsKarp<Id, Amt>
where
    Id: AccountId,
    Amt: Amount,
{
    type NodeId = NodeIndex;
    type EdgeCapacity = Amt;
    type Network = ResidualNetwork<Id, Amt>;
    type Error = Error;

    fn max_flow(
        &mut self,
        network: &mut Self::Network,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Amt, Error> {
        if network.state() != GraphState::Fresh {
            return Err(Error::AlreadySolved);
        }

        let mut total = Amt::zero();

        // A network is at maximum flow exactly when the residual graph has
        // no augmenting path left.
        while let Some(parents) = augmenting_path(network, source, sink)? {
            let mut bottleneck = Amt::max_value();
            let mut node = sink;
            while node != source {
                let edge = network.edge(parents[&node]);
                bottleneck = min(bottleneck, edge.residual_capacity_to(node)?);
                node = edge.other_node(node);
            }

            // Push the bottleneck along the path; capacity to cancel grows
            // by the same amount on every edge.
            let mut node = sink;
            while node != source {
                let edge = parents[&node];
                let next = network.edge(edge).other_node(node);
                network.edge_mut(edge).add_residual_flow_to(node, bottleneck)?;
                node = next;
            }

            total = total.checked_add(&bottleneck).ok_or(Error::Overflow)?;
            log::trace!("augmented by {bottleneck}, accumulated {total}");
        }

        // Marked even when no path was found at all, so a repeat run on the
        // same instance always fails instead of silently double-counting.
        network.mark_solved();
        log::debug!("max flow {total}");
        Ok(total)
    }
}

/// Breadth-first search for a source-to-sink path where every edge has
/// positive residual capacity towards the far endpoint. Returns the
/// parent-edge map on success, stopping the first time the sink is reached.
fn augmenting_path<Id, Amt>(
    network: &ResidualNetwork<Id, Amt>,
    source: NodeIndex,
    sink: NodeIndex,
) -> Result<Option<BTreeMap<NodeIndex, EdgeIndex>>, Error>
where
    Id: AccountId,
    Amt: Amount,
{
    let mut parents = BTreeMap::new();
    let mut queue = VecDeque::from([source]);

    while let Some(node) = queue.pop_front() {
        for edge_index in network.incident_edges(node) {
            let edge = network.edge(edge_index);
            let other = edge.other_node(node);

            if other == source || parents.contains_key(&other) {
                continue;
            }
            if edge.residual_capacity_to(other)? > Amt::zero() {
                parents.insert(other, edge_index);
                if other == sink {
                    return Ok(Some(parents));
                }
                queue.push_back(other);
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FlowNode;

    fn build_network() -> (ResidualNetwork<i32, i64>, Vec<NodeIndex>) {
        let mut network = ResidualNetwork::new();
        let nodes: Vec<_> = (0..5)
            .map(|id| network.add_node(FlowNode::Account(id)))
            .collect();
        for (from, to, capacity) in [
            (0usize, 1usize, 10i64),
            (1, 2, 5),
            (2, 4, 5),
            (1, 3, 7),
            (3, 4, 3),
        ] {
            network
                .add_edge(nodes[from], nodes[to], capacity, None)
                .unwrap();
        }
        (network, nodes)
    }

    #[test]
    fn computes_the_maximum_flow() {
        for (source, sink, expected) in [(0usize, 2usize, 5i64), (3, 4, 3), (0, 4, 8)] {
            let (mut network, nodes) = build_network();
            let flow = EdmondsKarp::default()
                .max_flow(&mut network, nodes[source], nodes[sink])
                .unwrap();
            assert_eq!(flow, expected);
        }
    }

    #[test]
    fn solved_networks_cannot_be_solved_again() {
        let (mut network, nodes) = build_network();
        assert_eq!(network.state(), GraphState::Fresh);

        EdmondsKarp::default()
            .max_flow(&mut network, nodes[0], nodes[4])
            .unwrap();
        assert_eq!(network.state(), GraphState::Solved);

        assert_eq!(
            EdmondsKarp::default().max_flow(&mut network, nodes[0], nodes[4]),
            Err(Error::AlreadySolved)
        );
    }

    #[test]
    fn flow_stays_within_capacity_after_solving() {
        let (mut network, nodes) = build_network();
        EdmondsKarp::default()
            .max_flow(&mut network, nodes[0], nodes[4])
            .unwrap();

        for edge in network.edges() {
            assert!(edge.flow() >= 0);
            assert!(edge.flow() <= edge.capacity());
        }
    }

    #[test]
    fn zero_flow_still_marks_the_network_solved() {
        let mut network = ResidualNetwork::<i32, i64>::new();
        let a = network.add_node(FlowNode::Account(0));
        let b = network.add_node(FlowNode::Account(1));

        let flow = EdmondsKarp::default().max_flow(&mut network, a, b).unwrap();
        assert_eq!(flow, 0);
        assert_eq!(network.state(), GraphState::Solved);
        assert!(EdmondsKarp::default().max_flow(&mut network, a, b).is_err());
    }

    #[test]
    fn cancellation_reroutes_a_blocking_first_path() {
        // If the first augmenting path runs 0-1-2-5 it blocks both
        // remaining routes; the second path must then cancel flow on the
        // 1->2 edge to reach the maximum of 2.
        let mut network = ResidualNetwork::<i32, i64>::new();
        let nodes: Vec<_> = (0..6)
            .map(|id| network.add_node(FlowNode::Account(id)))
            .collect();
        for (from, to) in [
            (0usize, 1usize),
            (1, 2),
            (2, 5),
            (0, 3),
            (3, 2),
            (1, 4),
            (4, 5),
        ] {
            network.add_edge(nodes[from], nodes[to], 1i64, None).unwrap();
        }

        let flow = EdmondsKarp::default()
            .max_flow(&mut network, nodes[0], nodes[5])
            .unwrap();
        assert_eq!(flow, 2);
    }
}
