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

//! The per-AS router: BGP-like route learning, best-path selection, and re-broadcast.

pub mod sav;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::message::{BgpAnnouncement, Message, SavMechanism};
use crate::topology::Topology;
use crate::types::{AsPath, Asn, InterfaceId, Neighbor, Prefix, Relationship};

/// The per-AS configuration supplied at router construction: which prefixes this AS originates,
/// which SAV mechanism it runs, how long it waits before its first broadcast, and its
/// per-neighbor export policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// The SAV mechanism this router runs.
    pub sav: SavMechanism,
    /// The prefixes this AS originates.
    pub own_prefixes: Vec<Prefix>,
    /// Delay, in virtual time units, before the router's first full broadcast.
    pub init_delay: f64,
    /// Per-neighbor prefix whitelist. An empty map is permissive (every neighbor gets
    /// everything); a non-empty map only exports the listed prefixes to the listed neighbors, and
    /// nothing at all to a neighbor absent from the map.
    pub export_policy: BTreeMap<Asn, Vec<Prefix>>,
}

/// A single AS's BGP-like routing state and SAV allowlist.
#[derive(Debug)]
pub struct Router {
    asn: Asn,
    neighbors: Vec<Neighbor>,
    customers: HashMap<Asn, InterfaceId>,
    providers: HashMap<Asn, InterfaceId>,
    peers: HashMap<Asn, InterfaceId>,

    local_prefixes: BTreeSet<Prefix>,
    adj_ribs_in: BTreeMap<Prefix, Vec<AsPath>>,
    prefix_origins: BTreeMap<Prefix, BTreeSet<Asn>>,
    loc_rib: BTreeMap<Prefix, AsPath>,
    adj_ribs_out: BTreeMap<Prefix, Vec<AsPath>>,
    export_policy: BTreeMap<Asn, BTreeSet<Prefix>>,
    sav_mechanism: SavMechanism,
    sav_allowlist: BTreeMap<InterfaceId, BTreeSet<Prefix>>,

    init_delay: f64,
    send_seq: u64,
}

impl Router {
    /// Construct a router for `asn`, assigning interfaces to its neighbors in the order the
    /// topology's outgoing edges from `asn` are iterated, and seeding its RIBs from
    /// `config.own_prefixes`.
    pub fn new(asn: Asn, topology: &Topology, config: &RouterConfig) -> Router {
        log::info!("time:{:.4} Creating AS{}", 0.0, asn.0);

        let mut neighbors = Vec::new();
        let mut customers = HashMap::new();
        let mut providers = HashMap::new();
        let mut peers = HashMap::new();

        for (iface_num, (nbr_asn, link)) in topology.neighbors_out(asn).enumerate() {
            let interface = InterfaceId(iface_num as u32);
            let relationship = match link.kind {
                crate::topology::LinkType::PeerToPeer => {
                    peers.insert(nbr_asn, interface);
                    Relationship::Peer
                }
                crate::topology::LinkType::CustomerToProvider => {
                    providers.insert(nbr_asn, interface);
                    Relationship::Provider
                }
                crate::topology::LinkType::ProviderToCustomer => {
                    customers.insert(nbr_asn, interface);
                    Relationship::Customer
                }
            };
            log::info!(
                "time:{:.4} AS{} added as {:?} to AS{} on interface {}",
                0.0,
                nbr_asn.0,
                relationship,
                asn.0,
                interface.0
            );
            neighbors.push(Neighbor {
                asn: nbr_asn,
                relationship,
                interface,
            });
        }

        let local_prefixes: BTreeSet<Prefix> = config.own_prefixes.iter().cloned().collect();
        let mut adj_ribs_in: BTreeMap<Prefix, Vec<AsPath>> = BTreeMap::new();
        let mut prefix_origins: BTreeMap<Prefix, BTreeSet<Asn>> = BTreeMap::new();
        let mut loc_rib: BTreeMap<Prefix, AsPath> = BTreeMap::new();
        let mut adj_ribs_out: BTreeMap<Prefix, Vec<AsPath>> = BTreeMap::new();

        for p in &local_prefixes {
            let path = AsPath::origin_only(asn);
            loc_rib.insert(p.clone(), path.clone());
            adj_ribs_in.insert(p.clone(), vec![path.clone()]);
            prefix_origins.insert(p.clone(), BTreeSet::from([asn]));
            adj_ribs_out.insert(p.clone(), vec![path]);
        }

        let export_policy = config
            .export_policy
            .iter()
            .map(|(nbr, prefixes)| (*nbr, prefixes.iter().cloned().collect()))
            .collect();

        Router {
            asn,
            neighbors,
            customers,
            providers,
            peers,
            local_prefixes,
            adj_ribs_in,
            prefix_origins,
            loc_rib,
            adj_ribs_out,
            export_policy,
            sav_mechanism: config.sav,
            sav_allowlist: BTreeMap::new(),
            init_delay: config.init_delay,
            send_seq: 0,
        }
    }

    /// The AS number of this router.
    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// The delay before this router's first full broadcast.
    pub fn init_delay(&self) -> f64 {
        self.init_delay
    }

    /// The current best path per known prefix.
    pub fn loc_rib(&self) -> &BTreeMap<Prefix, AsPath> {
        &self.loc_rib
    }

    /// All paths learned from neighbors, per prefix.
    pub fn adj_ribs_in(&self) -> &BTreeMap<Prefix, Vec<AsPath>> {
        &self.adj_ribs_in
    }

    /// The per-interface SAV allowlist.
    pub fn sav_allowlist(&self) -> &BTreeMap<InterfaceId, BTreeSet<Prefix>> {
        &self.sav_allowlist
    }

    /// The interface facing `asn`, if it is a known neighbor.
    pub fn interface_of(&self, asn: Asn) -> Option<InterfaceId> {
        self.customers
            .get(&asn)
            .or_else(|| self.providers.get(&asn))
            .or_else(|| self.peers.get(&asn))
            .copied()
    }

    /// The AS numbers of this router's customer neighbors.
    pub(crate) fn customers(&self) -> &HashMap<Asn, InterfaceId> {
        &self.customers
    }

    /// Run this router's one-time initialization: a full broadcast of `loc_rib` to every
    /// neighbor.
    pub fn init(&mut self) -> Vec<(Asn, Message)> {
        log::info!("time:{:.4} AS{} starts running", self.init_delay, self.asn.0);
        self.bgp_broadcast(true)
    }

    /// Dispatch an inbound message to the right handler. Unsupported variants are logged and
    /// dropped.
    pub fn handle_message(&mut self, now: f64, msg: Message) -> Vec<(Asn, Message)> {
        match msg {
            Message::Bgp(ann) => self.handle_bgp_message(now, &ann),
            Message::SavNet(_) => {
                log::warn!(
                    "time:{now:.4} AS{} received a SAVNET message (unimplemented), dropping",
                    self.asn.0
                );
                Vec::new()
            }
        }
    }

    /// Handle one inbound BGP announcement.
    ///
    /// RIB mutation is atomic per message: the set of genuinely new paths is computed first,
    /// against a read-only view of the current RIBs, and only then committed, so a message never
    /// leaves the router in a partially-updated state.
    fn handle_bgp_message(&mut self, now: f64, ann: &BgpAnnouncement) -> Vec<(Asn, Message)> {
        log::info!("time:{now:.4} AS{} receives {:?}", self.asn.0, ann.message_id);

        let mut new_paths: BTreeMap<Prefix, Vec<AsPath>> = BTreeMap::new();
        for (prefix, received_paths) in &ann.payload {
            for path in received_paths {
                let already_known = self
                    .adj_ribs_in
                    .get(prefix)
                    .map(|existing| existing.contains(path))
                    .unwrap_or(false);
                let already_staged = new_paths
                    .get(prefix)
                    .map(|staged| staged.contains(path))
                    .unwrap_or(false);
                if !already_known && !already_staged {
                    new_paths.entry(prefix.clone()).or_default().push(path.clone());
                }
            }
        }

        // Commit: extend adj_ribs_in and prefix_origins with the new paths.
        for (prefix, paths) in &new_paths {
            let rib_entry = self.adj_ribs_in.entry(prefix.clone()).or_default();
            let origins_entry = self.prefix_origins.entry(prefix.clone()).or_default();
            for path in paths {
                rib_entry.push(path.clone());
                origins_entry.insert(path.origin());
            }
        }

        // Best-path selection: strictly shorter paths displace; ties keep the incumbent.
        for (prefix, paths) in &new_paths {
            if !self.loc_rib.contains_key(prefix) {
                self.loc_rib.insert(prefix.clone(), paths[0].clone());
            }
            for path in paths {
                if path.len() < self.loc_rib[prefix].len() {
                    self.loc_rib.insert(prefix.clone(), path.clone());
                }
            }
        }

        self.adj_ribs_out = new_paths;
        let out = self.bgp_broadcast(false);
        self.adj_ribs_out.clear();

        sav::recompute(self);
        out
    }

    /// Compose and address outbound BGP announcements for every neighbor.
    ///
    /// When `full`, every prefix in `loc_rib` is offered (the initialization broadcast);
    /// otherwise only the queued `adj_ribs_out` delta is offered. Each candidate path is rewritten
    /// per destination: locally-originated prefixes are always re-announced as `[self]`
    /// (independent of the stored path), learned prefixes are prefixed with `self` unless the
    /// destination already appears on the path (loop prevention), in which case they are dropped.
    /// The per-neighbor export policy is applied last; an empty payload means nothing is sent.
    fn bgp_broadcast(&mut self, full: bool) -> Vec<(Asn, Message)> {
        let mut out = Vec::new();

        // Borrow-split: collect the candidate (prefix, paths) pairs up front so the loop below
        // can mutate `self.send_seq` freely.
        let sources: Vec<(Prefix, Vec<AsPath>)> = if full {
            self.loc_rib
                .iter()
                .map(|(p, path)| (p.clone(), vec![path.clone()]))
                .collect()
        } else {
            self.adj_ribs_out
                .iter()
                .map(|(p, paths)| (p.clone(), paths.clone()))
                .collect()
        };

        for nbr in self.neighbors.clone() {
            let mut payload: BTreeMap<Prefix, Vec<AsPath>> = BTreeMap::new();
            for (prefix, candidates) in &sources {
                for path in candidates {
                    let new_path = if self.local_prefixes.contains(prefix) {
                        AsPath::origin_only(self.asn)
                    } else if !path.contains(nbr.asn) {
                        AsPath::prepended(self.asn, path.clone())
                    } else {
                        continue;
                    };
                    payload.entry(prefix.clone()).or_default().push(new_path);
                }
            }

            if !self.export_policy.is_empty() {
                match self.export_policy.get(&nbr.asn) {
                    Some(allowed) => payload.retain(|p, _| allowed.contains(p)),
                    None => payload.clear(),
                }
            }

            if payload.is_empty() {
                continue;
            }

            self.send_seq += 1;
            let message_id = format!("{}-{}", self.asn.0, self.send_seq);
            log::info!(
                "time:{:.4} AS{} sends to AS{}: {message_id}",
                0.0,
                self.asn.0,
                nbr.asn.0
            );
            out.push((
                nbr.asn,
                Message::Bgp(BgpAnnouncement {
                    origin_asn: self.asn,
                    message_id,
                    payload,
                }),
            ));
        }

        out
    }
}
