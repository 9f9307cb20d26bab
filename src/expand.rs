use std::collections::BTreeMap;

use crate::account_id::AccountId;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{Provenance, ResidualNetwork};
use crate::node::FlowNode;
use crate::trust::TrustGraph;

/// Expands a multi-token trust graph into a single-commodity flow network.
///
/// Per (account, token) pair with outgoing trust, a three-edge gadget
/// funnels every outgoing relation of that token through one
/// capacity-bearing gate, so the account cannot send more than its holdings
/// no matter how many trustees accept them:
///
/// ```text
/// account --(unbounded)--> gate --(holdings)--> gate out --(unbounded)--> trustee
/// ```
///
/// Only the last edge of the gadget carries provenance; it is the one that
/// survives contraction.
pub fn expand<Id, Amt>(graph: &TrustGraph<Id, Amt>) -> Result<ResidualNetwork<Id, Amt>, Error>
where
    Id: AccountId,
    Amt: Amount,
{
    let mut network = ResidualNetwork::new();

    for account in graph.nodes() {
        network.add_node(FlowNode::Account(account.clone()));
    }

    let mut gate_outs = BTreeMap::new();
    for edge in graph.edges() {
        let origin = network.add_node(FlowNode::Account(edge.from().clone()));
        let target = network.add_node(FlowNode::Account(edge.to().clone()));
        let key = (edge.from().clone(), edge.token().clone());

        let gate_out = match gate_outs.get(&key) {
            Some(index) => *index,
            None => {
                let gate = network.add_node(FlowNode::TokenGate(
                    edge.from().clone(),
                    edge.token().clone(),
                ));
                let out = network.add_node(FlowNode::TokenGateOut(
                    edge.from().clone(),
                    edge.token().clone(),
                ));
                network.add_edge(origin, gate, Amt::max_value(), None)?;
                // The gadget's only capacity-bearing edge: the first trust
                // relation seen for this pair fixes the holdings.
                network.add_edge(gate, out, edge.capacity(), None)?;
                gate_outs.insert(key, out);
                out
            }
        };

        network.add_edge(
            gate_out,
            target,
            Amt::max_value(),
            Some(Provenance {
                from: edge.from().clone(),
                to: edge.to().clone(),
                token: edge.token().clone(),
                trust_capacity: edge.capacity(),
            }),
        )?;
    }

    Ok(network)
}
