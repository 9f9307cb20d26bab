use core::fmt::Display;
use std::collections::BTreeSet;

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::account_id::AccountId;
use crate::error::Error;

/// A directed trust relation: `to` accepts up to `capacity` units of `token`
/// coming from `from`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(
    try_from = "RawTrustEdge<Id, Amt>",
    bound(deserialize = "Id: PartialEq + Display + Deserialize<'de>, \
                    Amt: Zero + PartialOrd + Deserialize<'de>")
)]
pub struct TrustEdge<Id, Amt> {
    from: Id,
    to: Id,
    token: Id,
    capacity: Amt,
}

impl<Id, Amt> TrustEdge<Id, Amt>
where
    Id: PartialEq + Display,
    Amt: Zero + PartialOrd,
{
    pub fn new(from: Id, to: Id, token: Id, capacity: Amt) -> Result<Self, Error> {
        if from == to {
            Err(Error::SelfLoop(from.to_string()))
        } else if capacity < Amt::zero() {
            Err(Error::NegativeCapacity)
        } else {
            Ok(Self {
                from,
                to,
                token,
                capacity,
            })
        }
    }
}

impl<Id, Amt> TrustEdge<Id, Amt> {
    pub fn from(&self) -> &Id {
        &self.from
    }

    pub fn to(&self) -> &Id {
        &self.to
    }

    pub fn token(&self) -> &Id {
        &self.token
    }
}

impl<Id, Amt: Copy> TrustEdge<Id, Amt> {
    pub fn capacity(&self) -> Amt {
        self.capacity
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct RawTrustEdge<Id, Amt> {
    pub from: Id,
    pub to: Id,
    pub token: Id,
    pub capacity: Amt,
}

impl<Id, Amt> TryFrom<RawTrustEdge<Id, Amt>> for TrustEdge<Id, Amt>
where
    Id: PartialEq + Display,
    Amt: Zero + PartialOrd,
{
    type Error = Error;

    fn try_from(e: RawTrustEdge<Id, Amt>) -> Result<Self, Self::Error> {
        Self::new(e.from, e.to, e.token, e.capacity)
    }
}

impl<Id, Amt> From<TrustEdge<Id, Amt>> for RawTrustEdge<Id, Amt> {
    fn from(e: TrustEdge<Id, Amt>) -> Self {
        Self {
            from: e.from,
            to: e.to,
            token: e.token,
            capacity: e.capacity,
        }
    }
}

/// A validated trust network: declared accounts plus trust relations whose
/// endpoints and token issuers are all declared.
///
/// Construction is the only way to obtain one, so downstream stages never
/// see dangling node references.
#[derive(Clone, Debug)]
pub struct TrustGraph<Id, Amt> {
    nodes: Vec<Id>,
    edges: Vec<TrustEdge<Id, Amt>>,
}

impl<Id, Amt> TrustGraph<Id, Amt>
where
    Id: AccountId,
{
    pub fn new(nodes: Vec<Id>, edges: Vec<TrustEdge<Id, Amt>>) -> Result<Self, Error> {
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let declared: BTreeSet<&Id> = nodes.iter().collect();
        for edge in &edges {
            for node in [edge.from(), edge.to(), edge.token()] {
                if !declared.contains(node) {
                    return Err(Error::UnknownNode(node.to_string()));
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TrustEdge<Id, Amt>] {
        &self.edges
    }

    pub fn contains(&self, node: &Id) -> bool {
        self.nodes.iter().any(|n| n == node)
    }
}
