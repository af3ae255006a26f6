use std::fmt;
use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::os::fd::AsRawFd;

use crate::config::attr::from;
use crate::config::{Opts, Target};
use crate::event::Event;
use crate::ffi::syscall::{ioctl_arg, perf_event_open, read, IoctlOp};
use crate::ffi::{bindings as b, ioctls};

mod backend;
pub mod group;
#[cfg(test)]
pub(crate) mod mock;
mod result;
mod stat;

pub use backend::*;
pub use result::*;
pub use stat::*;

/// Counter control requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Reset,
    Enable,
    Disable,
}

impl Control {
    fn as_ioctl(self) -> IoctlOp {
        match self {
            Control::Reset => ioctls::RESET,
            Control::Enable => ioctls::ENABLE,
            Control::Disable => ioctls::DISABLE,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Control::Reset => "reset",
            Control::Enable => "enable",
            Control::Disable => "disable",
        })
    }
}

/// Whether a control request applies to one counter or to its whole group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Single,
    /// Issued on a group leader with `PERF_IOC_FLAG_GROUP`.
    Group,
}

/// One open `perf_event_open` counter.
pub struct Counter {
    pub(crate) target: Target,
    pub(crate) read_format: u64,
    pub(crate) perf: File,
}

impl Counter {
    /// Opens a stand-alone counter, which may later lead a group.
    pub fn new(event: impl Into<Event>, target: impl Into<Target>, opts: &Opts) -> Result<Self> {
        let target = target.into();
        let attr = from(event.into(), opts);
        let flags = b::PERF_FLAG_FD_CLOEXEC as u64;
        let perf = perf_event_open(&attr, target.pid, target.cpu, -1, flags)?;

        Ok(Self {
            target,
            read_format: attr.read_format,
            perf,
        })
    }

    /// Opens a counter as a member of `leader`'s group.
    pub fn new_member(event: impl Into<Event>, leader: &Counter, opts: &Opts) -> Result<Self> {
        let attr = from(event.into(), opts);
        let group_fd = leader.perf.as_raw_fd();
        // All events in a group should monitor the same task and CPU:
        // https://github.com/torvalds/linux/blob/v6.13/kernel/events/core.c#L12932
        let target = leader.target;
        let flags = b::PERF_FLAG_FD_CLOEXEC as u64;
        let perf = perf_event_open(&attr, target.pid, target.cpu, group_fd, flags)?;

        Ok(Self {
            target,
            read_format: attr.read_format,
            perf,
        })
    }

    pub fn control(&self, op: Control, scope: Scope) -> Result<()> {
        let arg = match scope {
            Scope::Single => 0,
            Scope::Group => b::PERF_IOC_FLAG_GROUP as u32,
        };
        ioctl_arg(&self.perf, op.as_ioctl(), arg)?;
        Ok(())
    }

    pub fn stat(&self) -> Result<Stat> {
        let mut buf = [0; Stat::MAX_READ_SIZE];
        let buf = &mut buf[..Stat::read_buf_size(self.read_format)];

        let bytes = read(&self.perf, buf)?;
        if bytes < buf.len() {
            return Err(Error::new(ErrorKind::UnexpectedEof, "short counter read"));
        }

        Stat::from_bytes(buf, self.read_format)
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "malformed counter read"))
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("target", &self.target)
            .field("fd", &self.perf.as_raw_fd())
            .finish()
    }
}
