use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::account_id::AccountId;
use crate::amount::Amount;
use crate::network::ResidualNetwork;

/// A flow-carrying trust relation in original node space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord<Id, Amt> {
    pub from: Id,
    pub to: Id,
    pub token: Id,
    pub capacity: Amt,
    pub flow: Amt,
}

/// A solved flow restricted to original accounts and trust relations.
#[derive(Clone, Debug, Default)]
pub struct ContractedFlow<Id, Amt> {
    pub nodes: Vec<Id>,
    pub edges: Vec<FlowRecord<Id, Amt>>,
}

/// Inverse of expansion: drops the synthetic gadget and keeps only trust
/// relations that ended up carrying flow, with the declared trust capacity
/// restored from provenance.
///
/// Records are deduplicated by (from, to, token); the first occurrence wins
/// (duplicates cannot arise from expansion, each input relation produces one
/// provenance edge). Referenced accounts and token issuers become the node
/// list, in first-seen order.
pub fn contract<Id, Amt>(network: &ResidualNetwork<Id, Amt>) -> ContractedFlow<Id, Amt>
where
    Id: AccountId,
    Amt: Amount,
{
    let mut seen = BTreeSet::new();
    let mut nodes: Vec<Id> = Vec::new();
    let mut edges = Vec::new();

    for edge in network.edges() {
        let Some(provenance) = edge.provenance() else {
            continue;
        };
        if edge.flow() <= Amt::zero() {
            continue;
        }

        let key = (
            provenance.from.clone(),
            provenance.to.clone(),
            provenance.token.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        for node in [&provenance.from, &provenance.to, &provenance.token] {
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
        }

        edges.push(FlowRecord {
            from: provenance.from.clone(),
            to: provenance.to.clone(),
            token: provenance.token.clone(),
            capacity: provenance.trust_capacity,
            flow: edge.flow(),
        });
    }

    ContractedFlow { nodes, edges }
}
