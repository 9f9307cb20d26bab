use core::fmt::Debug;

pub mod edmonds_karp;

/// The maximum flow algorithm.
pub trait MaxFlow {
    type NodeId;
    type EdgeCapacity;
    type Network;
    type Error: Debug;

    /// Run the algorithm from `source` to `sink` over the given network and
    /// return the total flow value, leaving the per-edge flows behind on the
    /// network for contraction.
    fn max_flow(
        &mut self,
        network: &mut Self::Network,
        source: Self::NodeId,
        sink: Self::NodeId,
    ) -> Result<Self::EdgeCapacity, Self::Error>;
}
