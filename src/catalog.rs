//! Static event catalogs.
//!
//! A catalog is the ordered list of counters to measure together with the
//! privilege levels excluded for them. The order of a catalog is the order of
//! the report.

use crate::config::Priv;
use crate::event::hw::{Hardware, Op, OpResult, Type};
use crate::event::raw::Raw;
use crate::event::sw::Software;
use crate::event::EventDescriptor;

#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    pub name: &'static str,
    pub events: &'static [EventDescriptor],
    pub exclude: Priv,
}

const BRANCHES: EventDescriptor = EventDescriptor::new("branches", Hardware::BranchInstr.event());
const MISSED_BRANCHES: EventDescriptor =
    EventDescriptor::new("missed_branches", Hardware::BranchMiss.event());
const CACHE_BPU: EventDescriptor = EventDescriptor::new(
    "cache_BPU",
    Hardware::Cache(Type::Bpu, Op::Read, OpResult::Access).event(),
);
const CPU_CLOCK: EventDescriptor = EventDescriptor::new("cpu_clock", Software::CpuClock.event());
const INSTRUCTIONS: EventDescriptor = EventDescriptor::new("instructions", Hardware::Instr.event());

/// Architecture-neutral events, kernel and hypervisor included.
pub static GENERIC: Catalog = Catalog {
    name: "generic",
    events: &[BRANCHES, MISSED_BRANCHES, CACHE_BPU, CPU_CLOCK, INSTRUCTIONS],
    exclude: Priv::NONE,
};

// BR_PRED, "predictable branch speculatively executed".
const A72_BRANCH_PRED: u64 = 0x12;

/// ARM Cortex-A72, user space only.
pub static CORTEX_A72: Catalog = Catalog {
    name: "cortex-a72",
    events: &[
        MISSED_BRANCHES,
        CACHE_BPU,
        CPU_CLOCK,
        INSTRUCTIONS,
        EventDescriptor::new("predicted_branches", Raw(A72_BRANCH_PRED).event()),
    ],
    exclude: Priv::USER_ONLY,
};

pub static ALL: [&Catalog; 2] = [&GENERIC, &CORTEX_A72];

pub fn by_name(name: &str) -> Option<&'static Catalog> {
    ALL.iter().copied().find(|it| it.name == name)
}
