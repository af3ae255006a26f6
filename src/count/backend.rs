use std::io::Result;

use super::{Control, Counter, Scope, Stat};
use crate::config::{Opts, Target};
use crate::event::EventDescriptor;

/// The platform side of a [`PerfGroup`][super::group::PerfGroup].
///
/// The group decides which counters to touch and when; a backend only knows
/// how to open, control, read and release one counter.
pub trait Backend {
    /// An open counter resource.
    type Counter;

    /// Whether counters can be opened as members of a leader and controlled
    /// through it.
    fn supports_grouping(&self) -> bool {
        true
    }

    /// Opens the counter for `event`, as a member of `leader` if given.
    fn open(&self, event: &EventDescriptor, leader: Option<&Self::Counter>) -> Result<Self::Counter>;

    fn control(&self, counter: &Self::Counter, op: Control, scope: Scope) -> Result<()>;

    fn read(&self, counter: &Self::Counter) -> Result<Stat>;

    /// Releases the counter.
    fn close(&self, counter: Self::Counter);
}

/// Counters backed by the `perf_event_open` system call.
#[derive(Clone, Debug, Default)]
pub struct PerfBackend {
    target: Target,
    opts: Opts,
}

impl PerfBackend {
    pub fn new(target: impl Into<Target>, opts: Opts) -> Self {
        Self {
            target: target.into(),
            opts,
        }
    }
}

impl Backend for PerfBackend {
    type Counter = Counter;

    fn open(&self, event: &EventDescriptor, leader: Option<&Counter>) -> Result<Counter> {
        match leader {
            Some(leader) => Counter::new_member(event.event(), leader, &self.opts),
            None => Counter::new(event.event(), self.target, &self.opts),
        }
    }

    fn control(&self, counter: &Counter, op: Control, scope: Scope) -> Result<()> {
        counter.control(op, scope)
    }

    fn read(&self, counter: &Counter) -> Result<Stat> {
        counter.stat()
    }

    fn close(&self, _counter: Counter) {}
}
