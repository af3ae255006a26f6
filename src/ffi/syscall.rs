use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::mem::{size_of, zeroed};
use std::os::fd::{AsRawFd, FromRawFd};

use libc::{c_int, c_uint};

use super::Attr;

/// Signature shared by the `perf_event_open_sys::ioctls` control requests.
pub type IoctlOp = unsafe fn(c_int, c_uint) -> c_int;

pub fn perf_event_open(attr: &Attr, pid: i32, cpu: i32, group_fd: i32, flags: u64) -> Result<File> {
    let num = libc::SYS_perf_event_open;
    let fd = unsafe { libc::syscall(num, attr as *const Attr, pid, cpu, group_fd, flags) };
    if fd != -1 {
        Ok(unsafe { File::from_raw_fd(fd as _) })
    } else {
        Err(Error::last_os_error())
    }
}

pub fn ioctl_arg(file: &File, op: IoctlOp, arg: u32) -> Result<i32> {
    let fd = file.as_raw_fd();
    let result = unsafe { op(fd, arg as _) };
    if result != -1 {
        Ok(result)
    } else {
        Err(Error::last_os_error())
    }
}

pub fn read(file: &File, buf: &mut [u8]) -> Result<usize> {
    let fd = file.as_raw_fd();
    let count = buf.len();
    let buf = buf.as_mut_ptr() as _;
    let bytes = unsafe { libc::read(fd, buf, count) };
    if bytes != -1 {
        Ok(bytes as _)
    } else {
        Err(Error::last_os_error())
    }
}

pub fn sched_setaffinity(cpu: u32) -> Result<()> {
    // `CPU_SET` indexes a fixed-size bitmap and panics past its end.
    if cpu as usize >= libc::CPU_SETSIZE as usize {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("cpu {} exceeds CPU_SETSIZE", cpu),
        ));
    }

    let mut set: libc::cpu_set_t = unsafe { zeroed() };
    unsafe {
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu as _, &mut set);
    }
    let result = unsafe { libc::sched_setaffinity(0, size_of::<libc::cpu_set_t>(), &set) };
    if result != -1 {
        Ok(())
    } else {
        Err(Error::last_os_error())
    }
}

pub fn sched_get_priority_max(policy: c_int) -> Result<c_int> {
    let prio = unsafe { libc::sched_get_priority_max(policy) };
    if prio != -1 {
        Ok(prio)
    } else {
        Err(Error::last_os_error())
    }
}

pub fn sched_setscheduler(policy: c_int, priority: c_int) -> Result<()> {
    // musl carries extra reserved fields, so start from zero.
    let mut param: libc::sched_param = unsafe { zeroed() };
    param.sched_priority = priority;
    let result = unsafe { libc::sched_setscheduler(0, policy, &param) };
    if result != -1 {
        Ok(())
    } else {
        Err(Error::last_os_error())
    }
}
