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

//! Module for defining the discrete-event scheduler and the actions it dispatches.

mod queue;
pub use queue::Scheduler;

use crate::message::Message;
use crate::types::Asn;

/// The closed set of actions the scheduler can carry. Deliberately a plain sum type rather than a
/// boxed closure: this is the Rust realization of the source's coroutine-suspension design (see
/// the "dynamic message dispatch" design note). A suspended mailbox-get or a pending
/// `send_message` delay both become a concrete, data-only continuation sitting in the queue.
#[derive(Debug, Clone)]
pub enum Action {
    /// Run a router's one-time initialization: assign interfaces, seed RIBs, and perform the
    /// first full broadcast.
    Init {
        /// The AS whose router should initialize.
        asn: Asn,
    },
    /// Deliver `msg` to the router at `dst`. Scheduled `latency` seconds after the sender put it
    /// on the wire.
    Deliver {
        /// The receiving AS.
        dst: Asn,
        /// The message to deliver.
        msg: Message,
    },
}

/// A concrete scheduler specialized to this simulator's [`Action`] type.
pub type SimScheduler = Scheduler<Action>;
