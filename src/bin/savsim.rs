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

//! Runs the RFC 8704 reference scenario: a 5-AS network in which AS1 is a multi-homed customer
//! of AS2, AS3, and AS5, AS4 is a customer of AS2 and AS3, and AS4-AS5 are settlement-free peers.
//! Every AS runs Enhanced Feasible-Path uRPF (Method A); the resulting per-interface SAV
//! allowlists are logged at the end of the run.
//!
//!           +----------+   P3[AS5 AS1]  +------------+
//!           | AS4(ISP4)|<---------------|  AS5(ISP5) |
//!           +----------+      (P2P)     +------------+
//!               /\   /\                        /\
//!               /     \                        /
//!   P1[AS2 AS1]/       \P2[AS3 AS1]           /
//!        (C2P)/         \(C2P)               /
//!            /           \                  /
//!     +----------+    +----------+         /
//!     | AS2(ISP2)|    | AS3(ISP3)|        /
//!     +----------+    +----------+       /
//!              /\           /\          /
//!               \           /          /
//!         P1[AS1]\         /P2[AS1]   /P3[AS1]
//!            (C2P)\       /(C2P)     /(C2P)
//!                  \     /          /
//!               +----------------+ /
//!               |  AS1(customer) |/
//!               +----------------+
//!                    P1, P2, P3 (prefixes originated)

use std::collections::BTreeMap;

use savrs::router::RouterConfig;
use savrs::simulation::Simulation;
use savrs::topology::{EdgeSpec, LinkType, Topology};
use savrs::types::Asn;

fn edge(from: u32, to: u32, kind: LinkType) -> EdgeSpec {
    EdgeSpec {
        from: Asn(from),
        to: Asn(to),
        kind,
        latency: 0.05,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let edges = vec![
        edge(4, 5, LinkType::PeerToPeer),
        edge(5, 4, LinkType::PeerToPeer),
        edge(2, 4, LinkType::CustomerToProvider),
        edge(4, 2, LinkType::ProviderToCustomer),
        edge(3, 4, LinkType::CustomerToProvider),
        edge(4, 3, LinkType::ProviderToCustomer),
        edge(1, 2, LinkType::CustomerToProvider),
        edge(2, 1, LinkType::ProviderToCustomer),
        edge(1, 3, LinkType::CustomerToProvider),
        edge(3, 1, LinkType::ProviderToCustomer),
        edge(1, 5, LinkType::CustomerToProvider),
        edge(5, 1, LinkType::ProviderToCustomer),
    ];

    let (topology, warnings) = Topology::from_edges(&edges);
    for w in &warnings {
        log::error!("topology configuration problem: {w}");
    }

    let mut configs = BTreeMap::new();
    configs.insert(
        Asn(1),
        RouterConfig {
            sav: savrs::message::SavMechanism::EfpUrpfA,
            own_prefixes: vec!["p1.1".into(), "p1.2".into(), "p1.3".into()],
            init_delay: 0.0,
            export_policy: BTreeMap::from([
                (Asn(2), vec!["p1.1".into()]),
                (Asn(3), vec!["p1.2".into()]),
                (Asn(5), vec!["p1.3".into()]),
            ]),
        },
    );
    for (asn, prefix) in [(2, "p2.1"), (3, "p3.1"), (4, "p4.1"), (5, "p5.1")] {
        configs.insert(
            Asn(asn),
            RouterConfig {
                sav: savrs::message::SavMechanism::EfpUrpfA,
                own_prefixes: vec![prefix.into()],
                init_delay: 0.0,
                export_policy: BTreeMap::new(),
            },
        );
    }

    let mut sim = Simulation::new(topology, configs);
    sim.run();
    sim.report();
}
