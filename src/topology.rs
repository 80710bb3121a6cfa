// BgpSim: BGP Network Simulator written in Rust
// Copyright 2022-2024 Tibor Schneider <sctibor@ethz.ch>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Directed graph of business relationships between autonomous systems.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Asn;

/// The business relationship that a directed edge encodes.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LinkType {
    /// The edge points from a customer to its provider.
    CustomerToProvider,
    /// The edge points from a provider to its customer.
    ProviderToCustomer,
    /// A settlement-free peer-to-peer edge.
    PeerToPeer,
}

impl LinkType {
    /// The link type that must label the reverse edge for a topology to be valid.
    pub fn reverse(self) -> Self {
        match self {
            LinkType::CustomerToProvider => LinkType::ProviderToCustomer,
            LinkType::ProviderToCustomer => LinkType::CustomerToProvider,
            LinkType::PeerToPeer => LinkType::PeerToPeer,
        }
    }
}

/// Edge attributes: the business relationship and the propagation latency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Link {
    /// The relationship this edge encodes, from source to target.
    pub kind: LinkType,
    /// The per-link latency applied to every message sent over this edge.
    pub latency: f64,
}

/// A raw, not-yet-validated edge supplied by a topology builder.
#[derive(Debug, Clone, Copy)]
pub struct EdgeSpec {
    /// Source AS of the directed edge.
    pub from: Asn,
    /// Target AS of the directed edge.
    pub to: Asn,
    /// The relationship this edge claims, from `from` to `to`.
    pub kind: LinkType,
    /// The latency on this edge.
    pub latency: f64,
}

/// A configuration problem discovered while building a [`Topology`]. These are always logged and
/// the offending edge is skipped; they are only surfaced to the caller in aggregate via
/// [`Topology::from_edges`]'s warning list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// An edge has no matching reverse edge at all.
    #[error("AS{from}-AS{to} has no reverse edge")]
    MissingReverseEdge {
        /// The source AS of the forward edge.
        from: u32,
        /// The target AS of the forward edge.
        to: u32,
    },
    /// An edge's reverse edge exists but carries an inconsistent link type.
    #[error("AS{from}-AS{to} reverse edge has mismatched link type")]
    MismatchedReverseEdge {
        /// The source AS of the forward edge.
        from: u32,
        /// The target AS of the forward edge.
        to: u32,
    },
}

/// Directed graph of ASes, with [`Link`] edge weights. Read-only once built.
#[derive(Debug, Default)]
pub struct Topology {
    graph: StableDiGraph<Asn, Link>,
    nodes: HashMap<Asn, NodeIndex>,
}

impl Topology {
    /// Validate and build a topology from a list of raw edge specifications.
    ///
    /// Every edge must have a matching reverse edge with the complementary link type
    /// (`c2p <-> p2c`, `p2p <-> p2p`). Edges that fail this check are logged at `error` level and
    /// skipped, per the simulator's "log and continue" configuration-error policy; the warnings
    /// are also returned so a caller can inspect what was dropped.
    pub fn from_edges(edges: &[EdgeSpec]) -> (Topology, Vec<TopologyError>) {
        let mut topo = Topology::default();
        let mut warnings = Vec::new();

        let mut by_pair: HashMap<(Asn, Asn), LinkType> = HashMap::new();
        for e in edges {
            by_pair.insert((e.from, e.to), e.kind);
        }

        for e in edges {
            match by_pair.get(&(e.to, e.from)) {
                None => {
                    log::error!("AS{}-AS{} has no reverse edge, skipping", e.from.0, e.to.0);
                    warnings.push(TopologyError::MissingReverseEdge {
                        from: e.from.0,
                        to: e.to.0,
                    });
                }
                Some(reverse_kind) if *reverse_kind != e.kind.reverse() => {
                    log::error!(
                        "AS{}-AS{} reverse edge has mismatched link type, skipping",
                        e.from.0,
                        e.to.0
                    );
                    warnings.push(TopologyError::MismatchedReverseEdge {
                        from: e.from.0,
                        to: e.to.0,
                    });
                }
                Some(_) => {
                    topo.add_edge(e.from, e.to, e.kind, e.latency);
                }
            }
        }

        (topo, warnings)
    }

    fn node(&mut self, asn: Asn) -> NodeIndex {
        *self
            .nodes
            .entry(asn)
            .or_insert_with(|| self.graph.add_node(asn))
    }

    fn add_edge(&mut self, from: Asn, to: Asn, kind: LinkType, latency: f64) -> EdgeIndex {
        let a = self.node(from);
        let b = self.node(to);
        self.graph.add_edge(a, b, Link { kind, latency })
    }

    /// All AS numbers present in the topology.
    pub fn nodes(&self) -> impl Iterator<Item = Asn> + '_ {
        self.graph.node_weights().copied()
    }

    /// Iterate over the outgoing edges of `asn`, in insertion order, yielding `(neighbor, link)`.
    /// This order is what fixes the interface assignment at router construction.
    pub fn neighbors_out(&self, asn: Asn) -> impl Iterator<Item = (Asn, Link)> + '_ {
        let idx = self.nodes.get(&asn).copied();
        idx.into_iter().flat_map(move |idx| {
            self.graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| (self.graph[e.target()], *e.weight()))
        })
    }

    /// The latency of the edge `from -> to`, if it exists.
    pub fn latency(&self, from: Asn, to: Asn) -> Option<f64> {
        self.neighbors_out(from)
            .find(|(nbr, _)| *nbr == to)
            .map(|(_, link)| link.latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_consistent_c2p_pair() {
        let edges = vec![
            EdgeSpec {
                from: Asn(1),
                to: Asn(2),
                kind: LinkType::CustomerToProvider,
                latency: 0.05,
            },
            EdgeSpec {
                from: Asn(2),
                to: Asn(1),
                kind: LinkType::ProviderToCustomer,
                latency: 0.05,
            },
        ];
        let (topo, warnings) = Topology::from_edges(&edges);
        assert!(warnings.is_empty());
        assert_eq!(topo.neighbors_out(Asn(1)).count(), 1);
        assert_eq!(topo.neighbors_out(Asn(2)).count(), 1);
    }

    #[test]
    fn drops_edge_with_missing_reverse() {
        let edges = vec![EdgeSpec {
            from: Asn(1),
            to: Asn(2),
            kind: LinkType::PeerToPeer,
            latency: 0.05,
        }];
        let (topo, warnings) = Topology::from_edges(&edges);
        assert_eq!(warnings.len(), 1);
        assert_eq!(topo.neighbors_out(Asn(1)).count(), 0);
    }

    #[test]
    fn drops_edge_with_mismatched_reverse() {
        let edges = vec![
            EdgeSpec {
                from: Asn(1),
                to: Asn(2),
                kind: LinkType::CustomerToProvider,
                latency: 0.05,
            },
            EdgeSpec {
                from: Asn(2),
                to: Asn(1),
                kind: LinkType::PeerToPeer,
                latency: 0.05,
            },
        ];
        let (topo, warnings) = Topology::from_edges(&edges);
        assert_eq!(warnings.len(), 2);
        assert_eq!(topo.neighbors_out(Asn(1)).count(), 0);
    }
}
