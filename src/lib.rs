#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Transitive transfer computation over token trust networks.
//!
//! A trust network is a directed graph of accounts where an edge
//! `(from, to, token, capacity)` means `to` accepts up to `capacity` units
//! of `token` coming from `from`. [`find_transitive_transfer`] computes the
//! maximum value transferable between two accounts and an ordered sequence
//! of elementary token transfers realizing a requested amount of it.
//!
//! The pipeline: the multi-token trust graph is expanded into a
//! single-commodity flow network ([`expand`]), solved with Edmonds-Karp
//! ([`algo::edmonds_karp::EdmondsKarp`]), contracted back to account space
//! ([`contract`]) and decomposed into transfer steps ([`decompose`]).

pub mod algo;

mod account_id;
mod amount;
mod contract;
mod error;
mod expand;
mod network;
mod node;
mod transfer;
mod trust;

pub use account_id::AccountId;
pub use algo::edmonds_karp::EdmondsKarp;
pub use algo::MaxFlow;
pub use amount::Amount;
pub use contract::{contract, ContractedFlow, FlowRecord};
pub use error::Error;
pub use expand::expand;
pub use network::{FlowEdge, GraphState, Provenance, ResidualNetwork};
pub use node::FlowNode;
pub use transfer::{decompose, find_transitive_transfer, TransferStep, TransitiveTransfer};
pub use trust::{RawTrustEdge, TrustEdge, TrustGraph};
