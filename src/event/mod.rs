use std::borrow::Cow;
use std::fmt;

use crate::ffi::bindings as b;

pub mod hw;
pub mod raw;
pub mod sw;

/// Event source, mapped to `perf_event_attr::type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Generalized hardware events (`PERF_TYPE_HARDWARE`).
    Hardware,
    /// Kernel software events (`PERF_TYPE_SOFTWARE`).
    Software,
    /// Generalized hardware cache events (`PERF_TYPE_HW_CACHE`).
    Cache,
    /// Implementation-specific PMU events (`PERF_TYPE_RAW`).
    Raw,
}

impl EventKind {
    pub(crate) const fn as_type(self) -> u32 {
        (match self {
            EventKind::Hardware => b::PERF_TYPE_HARDWARE,
            EventKind::Software => b::PERF_TYPE_SOFTWARE,
            EventKind::Cache => b::PERF_TYPE_HW_CACHE,
            EventKind::Raw => b::PERF_TYPE_RAW,
        }) as u32
    }
}

/// An event kind together with its selector code (`perf_event_attr::config`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: EventKind,
    pub selector: u64,
}

macro_rules! into_event {
    ($ty:ty) => {
        impl From<$ty> for crate::event::Event {
            fn from(value: $ty) -> Self {
                value.event()
            }
        }

        impl From<&$ty> for crate::event::Event {
            fn from(value: &$ty) -> Self {
                value.event()
            }
        }
    };
}
use into_event;

/// One entry of an event catalog.
///
/// The position of a descriptor inside its catalog is the position of its
/// line in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventDescriptor {
    pub kind: EventKind,
    pub selector: u64,
    pub name: Cow<'static, str>,
}

impl EventDescriptor {
    pub const fn new(name: &'static str, event: Event) -> Self {
        Self {
            kind: event.kind,
            selector: event.selector,
            name: Cow::Borrowed(name),
        }
    }

    pub fn named(name: impl Into<Cow<'static, str>>, event: impl Into<Event>) -> Self {
        let event = event.into();
        Self {
            kind: event.kind,
            selector: event.selector,
            name: name.into(),
        }
    }

    pub fn event(&self) -> Event {
        Event {
            kind: self.kind,
            selector: self.selector,
        }
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} {:#x})", self.name, self.kind, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::hw::{Hardware, Op, OpResult, Type};
    use super::raw::Raw;
    use super::sw::Software;
    use super::*;

    #[test]
    fn test_hardware_selector() {
        let ev = Event::from(Hardware::BranchMiss);
        assert_eq!(ev.kind, EventKind::Hardware);
        assert_eq!(ev.selector, b::PERF_COUNT_HW_BRANCH_MISSES as u64);
    }

    #[test]
    fn test_cache_selector_layout() {
        let ev = Hardware::Cache(Type::L1d, Op::Write, OpResult::Miss).event();
        let expected = b::PERF_COUNT_HW_CACHE_L1D as u64
            | (b::PERF_COUNT_HW_CACHE_OP_WRITE as u64) << 8
            | (b::PERF_COUNT_HW_CACHE_RESULT_MISS as u64) << 16;
        assert_eq!(ev.kind, EventKind::Cache);
        assert_eq!(ev.selector, expected);
    }

    #[test]
    fn test_software_and_raw() {
        assert_eq!(Software::CpuClock.event().kind, EventKind::Software);
        let raw = Event::from(Raw(0x12));
        assert_eq!(raw.kind, EventKind::Raw);
        assert_eq!(raw.selector, 0x12);
    }

    #[test]
    fn test_descriptor_keeps_name() {
        let desc = EventDescriptor::named(String::from("cycles"), Hardware::CpuCycle);
        assert_eq!(desc.name, "cycles");
        assert_eq!(desc.event(), Hardware::CpuCycle.event());
    }
}
