use super::{Event, EventKind};

/// A "raw" implementation-specific event, identified by the PMU event number.
///
/// The encoding is CPU specific, e.g. `Raw(0x12)` is `BR_PRED` on Cortex-A72.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Raw(pub u64);

impl Raw {
    pub const fn event(&self) -> Event {
        Event {
            kind: EventKind::Raw,
            selector: self.0,
        }
    }
}

super::into_event!(Raw);
