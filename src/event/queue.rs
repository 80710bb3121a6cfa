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

//! A single-threaded, virtual-time priority queue of scheduled actions.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::NotNan;

/// One entry in the scheduler's queue: an action due at `time`, tiebroken by `seq`.
///
/// `seq` is a monotonically increasing insertion counter. It is the deterministic tiebreaker
/// required whenever two actions share the same virtual time: the scheduler must always prefer
/// the one that was pushed first, so that replaying the same inputs reproduces the same event
/// order.
#[derive(Debug, Clone)]
struct ScheduledAction<A> {
    time: NotNan<f64>,
    seq: u64,
    action: A,
}

impl<A> PartialEq for ScheduledAction<A> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<A> Eq for ScheduledAction<A> {}

impl<A> PartialOrd for ScheduledAction<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for ScheduledAction<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so that `BinaryHeap` (a max-heap) pops the smallest `(time, seq)` first.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Single-threaded, cooperative, virtual-time scheduler.
///
/// At most one action is ever executing; the scheduler itself never runs anything; it only hands
/// back the next due action in deterministic `(time, seq)` order for the caller to dispatch. This
/// mirrors the source's `simpy.Environment`, but with an explicit queue instead of a coroutine
/// trampoline (see the module-level design note in `event::mod`).
#[derive(Debug)]
pub struct Scheduler<A> {
    now: NotNan<f64>,
    next_seq: u64,
    queue: BinaryHeap<ScheduledAction<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create a new, empty scheduler with virtual time starting at zero.
    pub fn new() -> Self {
        Self {
            now: NotNan::new(0.0).unwrap(),
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// The current virtual time.
    pub fn now(&self) -> f64 {
        self.now.into_inner()
    }

    /// Schedule `action` to run `delay` virtual-time units from now. `delay` must be
    /// non-negative.
    pub fn after(&mut self, delay: f64, action: A) {
        assert!(delay >= 0.0, "scheduled delay must be non-negative");
        let time = NotNan::new(self.now.into_inner() + delay).expect("delay must not be NaN");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledAction { time, seq, action });
    }

    /// Pop and return the next due action whose time is `<= t_limit`, advancing virtual time to
    /// that action's timestamp. Returns `None` once the queue is empty or the next action is
    /// later than `t_limit`.
    pub fn pop_until(&mut self, t_limit: f64) -> Option<A> {
        let next_time = self.queue.peek()?.time.into_inner();
        if next_time > t_limit {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = entry.time;
        Some(entry.action)
    }

    /// Drain events with time `<= t_limit`, calling `handler` for each one in deterministic
    /// order. `handler` may itself call [`Scheduler::after`] to enqueue follow-up actions, which
    /// will be picked up within the same `step_until` call if their time is still `<= t_limit`.
    pub fn step_until(&mut self, t_limit: f64, mut handler: impl FnMut(&mut Self, A)) {
        while let Some(action) = self.pop_until(t_limit) {
            handler(self, action);
        }
    }

    /// Run the scheduler until the queue is empty, dispatching every action to `handler`.
    pub fn run_to_completion(&mut self, handler: impl FnMut(&mut Self, A)) {
        self.step_until(f64::INFINITY, handler);
    }

    /// Number of actions currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
