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

#![deny(missing_docs, missing_debug_implementations)]

//! # savrs
//!
//! A discrete-event simulator of inter-domain BGP-like route propagation and RFC 8704 Enhanced
//! Feasible-Path uRPF (Method A) Source Address Validation allowlist derivation.
//!
//! The simulator is single-threaded and deterministic: every router runs the same route-learning
//! and best-path-selection logic, exchanging messages over a virtual-time event queue
//! ([`event`]). Business relationships between autonomous systems ([`topology`]) drive both
//! route export policy and the SAV allowlist ([`router::sav`]) each AS derives for its
//! interfaces.
//!
//! This is a research/teaching simulator. It does not model IP addressing, packet forwarding, or
//! any OSI layer below the control plane; see each module's documentation for the exact scope.

pub mod event;
pub mod message;
pub mod router;
pub mod simulation;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
