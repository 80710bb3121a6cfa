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

//! Top-level simulation driver: wires up routers, the topology, and the event scheduler, and runs
//! the whole network to quiescence.

use std::collections::BTreeMap;

use crate::event::{Action, SimScheduler};
use crate::router::{Router, RouterConfig};
use crate::topology::Topology;
use crate::types::Asn;

/// Owns every router in the network plus the scheduler that drives message delivery between
/// them. This is the simulator's entry point: build one with [`Simulation::new`], then call
/// [`Simulation::run`] to drain the event queue to completion.
#[derive(Debug)]
pub struct Simulation {
    topology: Topology,
    routers: BTreeMap<Asn, Router>,
    scheduler: SimScheduler,
}

impl Simulation {
    /// Build a simulation: one [`Router`] per entry in `configs`, scheduling each router's
    /// one-time initialization at its configured `init_delay`.
    pub fn new(topology: Topology, configs: BTreeMap<Asn, RouterConfig>) -> Simulation {
        let mut scheduler = SimScheduler::new();
        let mut routers = BTreeMap::new();

        for (asn, config) in &configs {
            let router = Router::new(*asn, &topology, config);
            scheduler.after(router.init_delay(), Action::Init { asn: *asn });
            routers.insert(*asn, router);
        }

        Simulation {
            topology,
            routers,
            scheduler,
        }
    }

    /// Drain the event queue until no more actions remain. Every message a router emits in
    /// response to an action is re-scheduled for delivery after the originating link's latency,
    /// so the whole network runs to a fixed point: no router has anything further to send.
    pub fn run(&mut self) {
        let topology = &self.topology;
        let routers = &mut self.routers;

        self.scheduler.run_to_completion(|sched, action| {
            let now = sched.now();
            let (from, messages) = match action {
                Action::Init { asn } => {
                    let out = routers.get_mut(&asn).map(|r| r.init()).unwrap_or_default();
                    (asn, out)
                }
                Action::Deliver { dst, msg } => {
                    let out = routers
                        .get_mut(&dst)
                        .map(|r| r.handle_message(now, msg))
                        .unwrap_or_default();
                    (dst, out)
                }
            };
            for (to, msg) in messages {
                if let Some(latency) = topology.latency(from, to) {
                    sched.after(latency, Action::Deliver { dst: to, msg });
                } else {
                    log::warn!(
                        "AS{} tried to send to non-neighbor AS{}, dropping",
                        from.0,
                        to.0
                    );
                }
            }
        });
    }

    /// Log a deterministic, ASN-ascending report of every router's best-path RIB, learned paths,
    /// and SAV allowlist.
    pub fn report(&self) {
        for (asn, router) in &self.routers {
            log::info!("=== {asn} ===");
            for (prefix, path) in router.loc_rib() {
                log::info!("  loc_rib[{prefix}] = {path}");
            }
            for (prefix, paths) in router.adj_ribs_in() {
                for path in paths {
                    log::info!("  adj_rib_in[{prefix}] += {path}");
                }
            }
            for (iface, prefixes) in router.sav_allowlist() {
                let list: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
                log::info!("  sav_allowlist[{iface}] = {{{}}}", list.join(", "));
            }
        }
    }

    /// Access the router for `asn`, if it exists. Primarily useful for tests.
    pub fn router(&self, asn: Asn) -> Option<&Router> {
        self.routers.get(&asn)
    }
}
