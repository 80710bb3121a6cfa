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

//! RFC 8704 Enhanced Feasible-Path uRPF, Method A: per-interface SAV allowlist derivation.

use std::collections::{BTreeMap, BTreeSet};

use crate::message::SavMechanism;
use crate::types::{Asn, Prefix};

use super::Router;

/// Recompute `router`'s SAV allowlist from its current `adj_ribs_in`, per the configured
/// mechanism. Only [`SavMechanism::EfpUrpfA`] has a defined algorithm; every other mechanism logs
/// a warning and leaves the allowlist untouched.
///
/// The allowlist only ever grows: a prefix once admitted on an interface is never withdrawn, even
/// if the path that justified it is later superseded in `loc_rib`.
pub fn recompute(router: &mut Router) {
    if !router.sav_mechanism.is_implemented() {
        unavailable(router);
        return;
    }

    // Step 1: set A, the customer ASes that appear anywhere on any received path, and set X(a)
    // for every AS a that appears anywhere on any received path: the prefixes reachable via a
    // path containing a.
    let customer_asns: BTreeSet<Asn> = router.customers().keys().copied().collect();

    let mut reachable_via: BTreeMap<Asn, BTreeSet<Prefix>> = BTreeMap::new();
    for (prefix, paths) in router.adj_ribs_in.iter() {
        for path in paths {
            for asn in path.iter() {
                reachable_via.entry(asn).or_default().insert(prefix.clone());
            }
        }
    }

    // Step 2 & 3: for every customer AS `a`, every prefix reachable via a path through `a`, and
    // every customer AS `o` that originates one of those prefixes, admit X(a) onto the interface
    // facing `o`.
    for &a in &customer_asns {
        let Some(reachable) = reachable_via.get(&a) else {
            continue;
        };
        for prefix in reachable {
            let Some(origins) = router.prefix_origins.get(prefix) else {
                continue;
            };
            for &o in origins {
                if !customer_asns.contains(&o) {
                    continue;
                }
                let Some(iface) = router.interface_of(o) else {
                    continue;
                };
                router
                    .sav_allowlist
                    .entry(iface)
                    .or_default()
                    .extend(reachable.iter().cloned());
            }
        }
    }
}

/// Log that SAV recomputation was skipped because the configured mechanism has no defined
/// algorithm in this simulator.
fn unavailable(router: &Router) {
    log::warn!(
        "AS{} is configured for {:?}, which is unimplemented; SAV allowlist left empty",
        router.asn().0,
        router.sav_mechanism,
    );
}
