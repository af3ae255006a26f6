use super::{Event, EventKind};
use crate::ffi::bindings as b;

#[derive(Clone, Copy, Debug)]
pub enum Hardware {
    CpuCycle,
    BusCycle,
    RefCpuCycle,

    Cache(Type, Op, OpResult),
    CacheMiss,
    CacheAccess,

    BranchMiss,
    BranchInstr,

    BackendStalledCycle,
    FrontendStalledCycle,

    Instr,
}

#[derive(Clone, Copy, Debug)]
pub enum Type {
    L1d,
    L1i,
    Ll,
    Dtlb,
    Itlb,
    Bpu,
    Node,
}

#[derive(Clone, Copy, Debug)]
pub enum Op {
    Read,
    Write,
    Prefetch,
}

#[derive(Clone, Copy, Debug)]
pub enum OpResult {
    Miss,
    Access,
}

impl Hardware {
    pub const fn event(&self) -> Event {
        let config = match self {
            Hardware::CpuCycle => b::PERF_COUNT_HW_CPU_CYCLES as u64,
            Hardware::BusCycle => b::PERF_COUNT_HW_BUS_CYCLES as u64,
            Hardware::RefCpuCycle => b::PERF_COUNT_HW_REF_CPU_CYCLES as u64,

            Hardware::Cache(ty, op, result) => {
                let id = match ty {
                    Type::L1d => b::PERF_COUNT_HW_CACHE_L1D,
                    Type::L1i => b::PERF_COUNT_HW_CACHE_L1I,
                    Type::Ll => b::PERF_COUNT_HW_CACHE_LL,
                    Type::Dtlb => b::PERF_COUNT_HW_CACHE_DTLB,
                    Type::Itlb => b::PERF_COUNT_HW_CACHE_ITLB,
                    Type::Bpu => b::PERF_COUNT_HW_CACHE_BPU,
                    Type::Node => b::PERF_COUNT_HW_CACHE_NODE,
                } as u64;
                let op = match op {
                    Op::Read => b::PERF_COUNT_HW_CACHE_OP_READ,
                    Op::Write => b::PERF_COUNT_HW_CACHE_OP_WRITE,
                    Op::Prefetch => b::PERF_COUNT_HW_CACHE_OP_PREFETCH,
                } as u64;
                let op_result = match result {
                    OpResult::Miss => b::PERF_COUNT_HW_CACHE_RESULT_MISS,
                    OpResult::Access => b::PERF_COUNT_HW_CACHE_RESULT_ACCESS,
                } as u64;
                // Cache events live under their own perf type.
                return Event {
                    kind: EventKind::Cache,
                    selector: id | (op << 8) | (op_result << 16),
                };
            }

            Hardware::CacheMiss => b::PERF_COUNT_HW_CACHE_MISSES as u64,
            Hardware::CacheAccess => b::PERF_COUNT_HW_CACHE_REFERENCES as u64,

            Hardware::BranchMiss => b::PERF_COUNT_HW_BRANCH_MISSES as u64,
            Hardware::BranchInstr => b::PERF_COUNT_HW_BRANCH_INSTRUCTIONS as u64,

            Hardware::BackendStalledCycle => b::PERF_COUNT_HW_STALLED_CYCLES_BACKEND as u64,
            Hardware::FrontendStalledCycle => b::PERF_COUNT_HW_STALLED_CYCLES_FRONTEND as u64,

            Hardware::Instr => b::PERF_COUNT_HW_INSTRUCTIONS as u64,
        };

        Event {
            kind: EventKind::Hardware,
            selector: config,
        }
    }
}

super::into_event!(Hardware);
