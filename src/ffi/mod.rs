pub mod syscall;

pub use perf_event_open_sys::bindings;
pub use perf_event_open_sys::ioctls;

pub type Attr = bindings::perf_event_attr;

// Reads a native-endian `u64` and advances the slice past it.
#[inline]
pub fn take_u64(buf: &mut &[u8]) -> Option<u64> {
    let (head, rest) = buf.split_first_chunk::<8>()?;
    *buf = rest;
    Some(u64::from_ne_bytes(*head))
}
