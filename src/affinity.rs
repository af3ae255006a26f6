//! Pinning the measuring thread to one core at real-time priority.
//!
//! Both steps only reduce noise, so failing at either one is logged and the
//! measurement carries on.

use tracing::{info, warn};

use crate::config::Cpu;
use crate::error::{Chain, Error, Result};
use crate::ffi::syscall::{sched_get_priority_max, sched_setaffinity, sched_setscheduler};

/// What [`pin`] managed to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pinning {
    /// The thread only runs on the requested core.
    pub pinned: bool,
}

impl Pinning {
    /// The CPU counters should be bound to: the pinned core, or any CPU if
    /// pinning failed.
    pub fn counter_cpu(&self, cpu: Cpu) -> Option<Cpu> {
        self.pinned.then_some(cpu)
    }
}

/// Raises the calling thread to the highest `SCHED_FIFO` priority, then binds
/// it to `cpu`.
///
/// Must run before the counters are created, and after any helper thread
/// is spawned: new threads inherit both the core and the priority.
pub fn pin(cpu: Cpu) -> Pinning {
    if let Err(err) = elevate_priority() {
        warn!("{}", Chain(&err));
    }

    let pinned = match set_affinity(cpu) {
        Ok(()) => {
            info!("pinned to CPU {}", cpu.0);
            true
        }
        Err(err) => {
            warn!("{}, running unpinned", Chain(&err));
            false
        }
    };

    Pinning { pinned }
}

/// Binds the calling thread to exactly one logical core.
pub fn set_affinity(cpu: Cpu) -> Result<()> {
    sched_setaffinity(cpu.0).map_err(|source| Error::AffinitySet { cpu: cpu.0, source })
}

/// Switches the calling thread to `SCHED_FIFO` at its highest priority.
pub fn elevate_priority() -> Result<()> {
    let policy = libc::SCHED_FIFO;
    sched_get_priority_max(policy)
        .and_then(|prio| sched_setscheduler(policy, prio))
        .map_err(|source| Error::PriorityElevation { source })
}
