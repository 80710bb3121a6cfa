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

//! Module containing the core data types: AS numbers, prefixes, AS-paths, and interfaces.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An Autonomous System Number.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asn(pub u32);

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

impl From<i32> for Asn {
    fn from(x: i32) -> Self {
        Self(x as u32)
    }
}

/// An opaque address-block label. Prefixes carry no subsumption or arithmetic semantics in this
/// simulator; two prefixes are equal iff their labels are equal.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct Prefix(Arc<str>);

impl Prefix {
    /// Create a new prefix from any string-like label.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self(label.into())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Prefix {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A non-empty, ordered sequence of AS numbers a route has traversed. The first element is the
/// origin; the last element is the last-hop (conventionally the advertising neighbor on receipt).
///
/// Two paths are equal iff their sequences are equal; this drives the deduplication a router
/// applies to the paths it has already learned for a prefix.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct AsPath(Vec<Asn>);

impl AsPath {
    /// Create a path with a single AS: the originator of a locally-originated prefix.
    pub fn origin_only(asn: Asn) -> Self {
        Self(vec![asn])
    }

    /// Prepend `asn` to an existing path, as done when re-advertising a learned route.
    pub fn prepended(asn: Asn, mut rest: AsPath) -> Self {
        rest.0.insert(0, asn);
        rest
    }

    /// The first AS on the path: the prefix's origin.
    pub fn origin(&self) -> Asn {
        self.0[0]
    }

    /// The number of AS-hops on this path, used for best-path length comparison.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An `AsPath` is never empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `asn` appears anywhere on the path (used for loop prevention on export).
    pub fn contains(&self, asn: Asn) -> bool {
        self.0.contains(&asn)
    }

    /// Iterate over the ASes on the path, origin first.
    pub fn iter(&self) -> impl Iterator<Item = Asn> + '_ {
        self.0.iter().copied()
    }

    /// Expose the path as a plain slice, mostly for tests and logging.
    pub fn as_slice(&self) -> &[Asn] {
        &self.0
    }
}

impl fmt::Display for AsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, asn) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{asn}")?;
        }
        write!(f, "]")
    }
}

/// A small, non-negative, per-router interface identifier. There is a bijection between
/// interfaces and neighbor AS numbers, fixed at router construction.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InterfaceId(pub u32);

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if{}", self.0)
    }
}

/// The business relationship of a neighboring AS, as seen from the local router.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Relationship {
    /// The neighbor is a customer: it is reachable over a `p2c` edge from us.
    Customer,
    /// The neighbor is a transit provider: we reach it over a `c2p` edge.
    Provider,
    /// The neighbor is a settlement-free peer.
    Peer,
}

/// A neighbor of a router, as recorded at setup time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Neighbor {
    /// The AS number of the neighbor.
    pub asn: Asn,
    /// The business relationship to that neighbor.
    pub relationship: Relationship,
    /// The local interface facing that neighbor.
    pub interface: InterfaceId,
}
