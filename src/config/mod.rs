use crate::ffi::bindings as b;

pub(crate) mod attr;
mod target;

pub use target::*;

/// Counter options shared by every counter of a measurement.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Privilege levels excluded from counting.
    pub exclude: Priv,

    /// Whether counters are controlled through a group leader.
    pub grouping: Grouping,

    /// Extra fields requested in each counter read.
    pub stat_format: StatFormat,
}

/// Privilege levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Priv {
    /// User space.
    pub user: bool,

    /// Kernel space.
    pub kernel: bool,

    /// Hypervisor.
    pub hv: bool,
}

impl Priv {
    pub const NONE: Priv = Priv {
        user: false,
        kernel: false,
        hv: false,
    };

    /// Only user space is counted.
    pub const USER_ONLY: Priv = Priv {
        user: false,
        kernel: true,
        hv: true,
    };
}

/// How the counters of a measurement are started and stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grouping {
    /// The first counter that opens becomes the group leader, the rest are
    /// opened as its members. Reset, enable and disable are a single ioctl
    /// on the leader, so every member counts the same instruction window.
    #[default]
    Leader,

    /// Every counter is opened on its own and controlled one by one.
    Independent,
}

/// Controls the format of [`Stat`][crate::count::Stat].
#[derive(Clone, Copy, Debug, Default)]
pub struct StatFormat {
    /// Contains the [enabled time][crate::count::Stat::time_enabled] of the counter.
    pub time_enabled: bool,

    /// Contains the [running time][crate::count::Stat::time_running] of the counter.
    pub time_running: bool,
}

impl StatFormat {
    pub(crate) fn as_read_format(&self) -> u64 {
        let mut val = 0;
        macro_rules! when {
            ($field:ident, $flag:ident) => {
                if self.$field {
                    val |= b::$flag as u64;
                }
            };
        }
        when!(time_enabled, PERF_FORMAT_TOTAL_TIME_ENABLED);
        when!(time_running, PERF_FORMAT_TOTAL_TIME_RUNNING);
        val
    }
}
