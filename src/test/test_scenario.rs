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

//! End-to-end test of the RFC 8704 reference scenario: AS1 is multi-homed to AS2, AS3, and AS5;
//! AS4 is a customer of AS2 and AS3 and a peer of AS5.

use std::collections::BTreeMap;

use crate::message::SavMechanism;
use crate::router::RouterConfig;
use crate::simulation::Simulation;
use crate::topology::{EdgeSpec, LinkType, Topology};
use crate::types::{Asn, Prefix};

fn reference_edges() -> Vec<EdgeSpec> {
    let e = |from: u32, to: u32, kind: LinkType| EdgeSpec {
        from: Asn(from),
        to: Asn(to),
        kind,
        latency: 0.05,
    };
    vec![
        e(4, 5, LinkType::PeerToPeer),
        e(5, 4, LinkType::PeerToPeer),
        e(2, 4, LinkType::CustomerToProvider),
        e(4, 2, LinkType::ProviderToCustomer),
        e(3, 4, LinkType::CustomerToProvider),
        e(4, 3, LinkType::ProviderToCustomer),
        e(1, 2, LinkType::CustomerToProvider),
        e(2, 1, LinkType::ProviderToCustomer),
        e(1, 3, LinkType::CustomerToProvider),
        e(3, 1, LinkType::ProviderToCustomer),
        e(1, 5, LinkType::CustomerToProvider),
        e(5, 1, LinkType::ProviderToCustomer),
    ]
}

fn reference_configs() -> BTreeMap<Asn, RouterConfig> {
    let mut configs = BTreeMap::new();
    configs.insert(
        Asn(1),
        RouterConfig {
            sav: SavMechanism::EfpUrpfA,
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
                sav: SavMechanism::EfpUrpfA,
                own_prefixes: vec![Prefix::from(prefix)],
                init_delay: 0.0,
                export_policy: BTreeMap::new(),
            },
        );
    }
    configs
}

fn run_reference_scenario() -> Simulation {
    let (topology, warnings) = Topology::from_edges(&reference_edges());
    assert!(warnings.is_empty());
    let mut sim = Simulation::new(topology, reference_configs());
    sim.run();
    sim
}

#[test]
fn as4_learns_as1_prefixes_via_every_customer() {
    let sim = run_reference_scenario();
    let as4 = sim.router(Asn(4)).unwrap();

    // AS1 fans p1.1/p1.2/p1.3 out separately per its export policy, but AS4 is reachable from
    // AS1 through both AS2 and AS3, so every one of those prefixes arrives at AS4 via at least
    // one customer path.
    for prefix in ["p1.1", "p1.2", "p1.3"] {
        assert!(
            as4.adj_ribs_in().contains_key(&Prefix::from(prefix)),
            "AS4 should learn {prefix} from at least one customer"
        );
    }
}

#[test]
fn efp_urpf_a_admits_as1_prefixes_on_as4s_customer_interfaces() {
    let sim = run_reference_scenario();
    let as4 = sim.router(Asn(4)).unwrap();

    let iface2 = as4.interface_of(Asn(2)).unwrap();
    let iface3 = as4.interface_of(Asn(3)).unwrap();
    let iface5 = as4.interface_of(Asn(5)).unwrap();

    let via_2 = &as4.sav_allowlist()[&iface2];
    let via_3 = &as4.sav_allowlist()[&iface3];

    assert!(via_2.contains(&Prefix::from("p2.1")));
    assert!(via_3.contains(&Prefix::from("p3.1")));

    // AS1's export policy only sends p1.1 toward AS2 and p1.2 toward AS3, so each customer
    // interface should admit the AS1 prefix that actually transits it.
    assert!(via_2.contains(&Prefix::from("p1.1")));
    assert!(via_3.contains(&Prefix::from("p1.2")));

    assert!(
        !as4.sav_allowlist().contains_key(&iface5),
        "AS5 is a peer of AS4, not a customer, so it never enters set A"
    );
}

#[test]
fn same_scenario_run_twice_produces_identical_state() {
    let sim_a = run_reference_scenario();
    let sim_b = run_reference_scenario();

    for asn in [1, 2, 3, 4, 5].map(Asn) {
        let a = sim_a.router(asn).unwrap();
        let b = sim_b.router(asn).unwrap();
        assert_eq!(a.loc_rib(), b.loc_rib(), "loc_rib must be reproducible for AS{}", asn.0);
        assert_eq!(
            a.adj_ribs_in(),
            b.adj_ribs_in(),
            "adj_ribs_in must be reproducible for AS{}",
            asn.0
        );
        assert_eq!(
            a.sav_allowlist(),
            b.sav_allowlist(),
            "sav_allowlist must be reproducible for AS{}",
            asn.0
        );
    }
}
