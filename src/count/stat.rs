use std::mem::size_of;

use crate::ffi::{bindings as b, take_u64};

/// A decoded counter read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stat {
    pub count: u64,
    pub time_enabled: Option<u64>,
    pub time_running: Option<u64>,
}

impl Stat {
    pub(crate) const MAX_READ_SIZE: usize = 3 * size_of::<u64>();

    // https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h#L344
    // struct read_format {
    //     u64 value;
    //     { u64 time_enabled; } && PERF_FORMAT_TOTAL_TIME_ENABLED
    //     { u64 time_running; } && PERF_FORMAT_TOTAL_TIME_RUNNING
    // };
    pub(crate) fn from_bytes(mut buf: &[u8], read_format: u64) -> Option<Self> {
        macro_rules! when {
            ($flag:ident) => {
                match read_format & b::$flag as u64 > 0 {
                    true => Some(take_u64(&mut buf)?),
                    false => None,
                }
            };
        }

        let count = take_u64(&mut buf)?;
        let time_enabled = when!(PERF_FORMAT_TOTAL_TIME_ENABLED);
        let time_running = when!(PERF_FORMAT_TOTAL_TIME_RUNNING);

        Some(Self {
            count,
            time_enabled,
            time_running,
        })
    }

    pub(crate) fn read_buf_size(read_format: u64) -> usize {
        let mut size = size_of::<u64>();

        macro_rules! when {
            ($flag:ident) => {
                if read_format & b::$flag as u64 > 0 {
                    size += size_of::<u64>();
                }
            };
        }

        when!(PERF_FORMAT_TOTAL_TIME_ENABLED);
        when!(PERF_FORMAT_TOTAL_TIME_RUNNING);

        size
    }

    /// The counter was enabled but the PMU never scheduled it, so `count`
    /// says nothing about the workload.
    pub fn never_scheduled(&self) -> bool {
        matches!(
            (self.time_enabled, self.time_running),
            (Some(enabled), Some(0)) if enabled > 0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(words: &[u64]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn test_plain_count() {
        let stat = Stat::from_bytes(&bytes(&[7]), 0).unwrap();
        assert_eq!(stat.count, 7);
        assert_eq!(stat.time_enabled, None);
        assert_eq!(Stat::read_buf_size(0), 8);
    }

    #[test]
    fn test_with_times() {
        let format = (b::PERF_FORMAT_TOTAL_TIME_ENABLED | b::PERF_FORMAT_TOTAL_TIME_RUNNING) as u64;
        assert_eq!(Stat::read_buf_size(format), Stat::MAX_READ_SIZE);

        let stat = Stat::from_bytes(&bytes(&[3, 100, 0]), format).unwrap();
        assert_eq!(stat.count, 3);
        assert_eq!(stat.time_enabled, Some(100));
        assert_eq!(stat.time_running, Some(0));
        assert!(stat.never_scheduled());
    }

    #[test]
    fn test_truncated_buffer() {
        let format = b::PERF_FORMAT_TOTAL_TIME_RUNNING as u64;
        assert_eq!(Stat::from_bytes(&bytes(&[3]), format), None);
    }
}
