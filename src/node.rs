use core::fmt::{self, Display, Formatter};

use crate::account_id::AccountId;

/// A node of the expanded flow network.
///
/// The gate variants exist only between expansion and contraction; they
/// never show up in transfer output. Keeping them as a typed enum (instead
/// of mangled account names) makes collisions with unusual account
/// identifiers impossible.
#[derive(Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum FlowNode<Id> {
    /// An account of the input trust graph.
    Account(Id),
    /// Collects all outgoing trust of one token held by one account.
    TokenGate(Id, Id),
    /// Fan-out point behind the gate, towards the accepting accounts.
    TokenGateOut(Id, Id),
}

impl<Id> From<Id> for FlowNode<Id>
where
    Id: AccountId,
{
    fn from(id: Id) -> Self {
        Self::Account(id)
    }
}

impl<Id: Display> Display for FlowNode<Id> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FlowNode::Account(account) => write!(f, "{account}"),
            FlowNode::TokenGate(account, token) => write!(f, "({account} x {token})"),
            FlowNode::TokenGateOut(account, token) => write!(f, "({account} x {token} out)"),
        }
    }
}
