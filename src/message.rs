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

//! Message types exchanged between routers over the event queue.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{AsPath, Asn, Prefix};

/// The Source Address Validation mechanism a router is configured to run. Integer values are
/// stable (they are part of the external configuration contract).
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[repr(u8)]
pub enum SavMechanism {
    /// Strict uRPF. Reserved: not implemented.
    StrictUrpf = 0,
    /// Loose uRPF. Reserved: not implemented.
    LooseUrpf = 1,
    /// Feasible-path uRPF. Reserved: not implemented.
    FeasiblePathUrpf = 2,
    /// Enhanced Feasible-Path uRPF, Method A of RFC 8704. The only operational mechanism.
    EfpUrpfA = 3,
    /// Enhanced Feasible-Path uRPF, Method B of RFC 8704. Reserved: not implemented.
    EfpUrpfB = 4,
    /// SAVNET. Reserved: not implemented.
    Savnet = 5,
}

impl SavMechanism {
    /// Whether this simulator has a defined algorithm for the mechanism.
    pub fn is_implemented(self) -> bool {
        matches!(self, SavMechanism::EfpUrpfA)
    }
}

/// A BGP-like route announcement: a message id plus a payload mapping each announced prefix to
/// the set of AS-paths offered for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BgpAnnouncement {
    /// The AS that sent this message (the sender, not necessarily the prefix origin).
    pub origin_asn: Asn,
    /// A unique-per-sender message id, used only for debugging/logging.
    pub message_id: String,
    /// Prefix to candidate AS-paths offered in this message.
    pub payload: BTreeMap<Prefix, Vec<AsPath>>,
}

/// Reserved message type for the SAVNET mechanism. Carries no payload yet: there is no defined
/// SAVNET behavior in this simulator (see [`SavMechanism::Savnet`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavNetMessage {
    /// The AS that sent this message.
    pub node_id: Asn,
    /// A unique-per-sender message id.
    pub message_id: String,
}

/// The closed set of message variants a router may receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// A BGP route announcement.
    Bgp(BgpAnnouncement),
    /// A reserved SAVNET message.
    SavNet(SavNetMessage),
}
