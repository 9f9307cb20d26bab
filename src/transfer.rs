use core::cmp::min;
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::account_id::AccountId;
use crate::algo::edmonds_karp::EdmondsKarp;
use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::contract::{contract, ContractedFlow};
use crate::error::Error;
use crate::expand::expand;
use crate::node::FlowNode;
use crate::trust::TrustGraph;

/// One elementary transfer: move `value` units of `token` from `from` to
/// `to`. Steps are numbered 1..N in execution order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStep<Id, Amt> {
    pub from: Id,
    pub to: Id,
    pub token: Id,
    pub value: Amt,
    pub step: usize,
}

/// Result of a transitive-transfer computation.
///
/// `transfer_steps` is empty and `transfer_value` zero when the requested
/// value exceeds `max_flow_value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransitiveTransfer<Id, Amt> {
    pub from: Id,
    pub to: Id,
    pub max_flow_value: Amt,
    pub transfer_value: Amt,
    pub transfer_steps: Vec<TransferStep<Id, Amt>>,
}

struct Frame<Amt> {
    /// Incoming flow-carrying edges of this frame's node, largest first.
    edges: Vec<usize>,
    cursor: usize,
    need: Amt,
    /// Allocation to append once the descent made for it has returned.
    pending: Option<(usize, Amt)>,
}

/// Decomposes a contracted flow into ordered transfer steps by allocating
/// the required value backward from `sink`, largest contributors first.
///
/// Greedy by intent: edges are not drained across branches and equal flows
/// keep their input order, so identical flow data always yields the
/// identical step sequence. Allocations for one relation reached through
/// several branches are consolidated into a single step at the position of
/// the first occurrence.
pub fn decompose<Id, Amt>(
    flow: &ContractedFlow<Id, Amt>,
    sink: &Id,
    value: Amt,
) -> Result<Vec<TransferStep<Id, Amt>>, Error>
where
    Id: AccountId,
    Amt: Amount,
{
    let incoming = |node: &Id| -> Vec<usize> {
        flow.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.to == *node && edge.flow > Amt::zero())
            .map(|(index, _)| index)
            .sorted_by(|a, b| flow.edges[*b].flow.cmp(&flow.edges[*a].flow))
            .collect()
    };

    // The contracted graph is acyclic for any flow an augmenting-path
    // solver produces; the bound turns a violation into an error instead of
    // an endless walk.
    let depth_bound = flow.edges.len() + 1;

    let mut allocations: Vec<(usize, Amt)> = Vec::new();
    let mut stack = vec![Frame {
        edges: incoming(sink),
        cursor: 0,
        need: value,
        pending: None,
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(done) = frame.pending.take() {
            allocations.push(done);
        }

        let mut descend = None;
        if frame.cursor < frame.edges.len() && frame.need > Amt::zero() {
            let edge = frame.edges[frame.cursor];
            frame.cursor += 1;

            let take = min(flow.edges[edge].flow, frame.need);
            frame.need -= take;
            // Upstream senders are visited before the step is appended, so
            // they appear earlier in the sequence.
            frame.pending = Some((edge, take));
            descend = Some((edge, take));
        }

        match descend {
            Some((edge, take)) => {
                if stack.len() >= depth_bound {
                    return Err(Error::DecompositionDepth);
                }
                stack.push(Frame {
                    edges: incoming(&flow.edges[edge].from),
                    cursor: 0,
                    need: take,
                    pending: None,
                });
            }
            None => {
                stack.pop();
            }
        }
    }

    let mut positions: BTreeMap<_, usize> = BTreeMap::new();
    let mut steps: Vec<TransferStep<Id, Amt>> = Vec::new();
    for (edge, take) in allocations {
        let record = &flow.edges[edge];
        let key = (record.from.clone(), record.to.clone(), record.token.clone());
        match positions.get(&key) {
            Some(&position) => steps[position].value += take,
            None => {
                positions.insert(key, steps.len());
                steps.push(TransferStep {
                    from: record.from.clone(),
                    to: record.to.clone(),
                    token: record.token.clone(),
                    value: take,
                    step: 0,
                });
            }
        }
    }
    for (position, step) in steps.iter_mut().enumerate() {
        step.step = position + 1;
    }

    Ok(steps)
}

/// Computes the maximum transferable value between `from` and `to` and,
/// when the requested `value` is achievable, the ordered transfer plan
/// realizing it.
///
/// The expanded residual network lives for exactly one solver run and is
/// discarded after contraction.
pub fn find_transitive_transfer<Id, Amt>(
    graph: &TrustGraph<Id, Amt>,
    from: &Id,
    to: &Id,
    value: Amt,
) -> Result<TransitiveTransfer<Id, Amt>, Error>
where
    Id: AccountId,
    Amt: Amount,
{
    for node in [from, to] {
        if !graph.contains(node) {
            return Err(Error::UnknownNode(node.to_string()));
        }
    }
    if value <= Amt::zero() {
        return Err(Error::NonPositiveValue);
    }

    let mut network = expand(graph)?;
    let source = network
        .node_index(&FlowNode::Account(from.clone()))
        .ok_or_else(|| Error::UnknownNode(from.to_string()))?;
    let sink = network
        .node_index(&FlowNode::Account(to.clone()))
        .ok_or_else(|| Error::UnknownNode(to.to_string()))?;

    let max_flow_value = EdmondsKarp::default().max_flow(&mut network, source, sink)?;
    let contracted = contract(&network);

    let (transfer_value, transfer_steps) = if max_flow_value >= value {
        (value, decompose(&contracted, to, value)?)
    } else {
        (Amt::zero(), Vec::new())
    };

    log::info!(
        "max flow {max_flow_value}, transferring {transfer_value} in {} steps",
        transfer_steps.len()
    );

    Ok(TransitiveTransfer {
        from: from.clone(),
        to: to.clone(),
        max_flow_value,
        transfer_value,
        transfer_steps,
    })
}
