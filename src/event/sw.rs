use super::{Event, EventKind};
use crate::ffi::bindings as b;

#[derive(Clone, Copy, Debug)]
pub enum Software {
    CpuClock,
    TaskClock,

    PageFault,
    MinorPageFault,
    MajorPageFault,

    EmuFault,
    AlignFault,

    CtxSwitch,
    CpuMigration,

    Dummy,
}

impl Software {
    pub const fn event(&self) -> Event {
        let config = match self {
            Software::CpuClock => b::PERF_COUNT_SW_CPU_CLOCK,
            Software::TaskClock => b::PERF_COUNT_SW_TASK_CLOCK,

            Software::PageFault => b::PERF_COUNT_SW_PAGE_FAULTS,
            Software::MinorPageFault => b::PERF_COUNT_SW_PAGE_FAULTS_MIN,
            Software::MajorPageFault => b::PERF_COUNT_SW_PAGE_FAULTS_MAJ,

            Software::EmuFault => b::PERF_COUNT_SW_EMULATION_FAULTS,
            Software::AlignFault => b::PERF_COUNT_SW_ALIGNMENT_FAULTS,

            Software::CtxSwitch => b::PERF_COUNT_SW_CONTEXT_SWITCHES,
            Software::CpuMigration => b::PERF_COUNT_SW_CPU_MIGRATIONS,

            Software::Dummy => b::PERF_COUNT_SW_DUMMY,
        } as u64;

        Event {
            kind: EventKind::Software,
            selector: config,
        }
    }
}

super::into_event!(Software);
