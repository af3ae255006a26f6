use std::borrow::Cow;
use std::fmt;

/// Reported value of a counter whose count is unavailable.
pub const UNAVAILABLE: i64 = -1;

/// The count of one catalog entry for one measurement.
///
/// An unavailable result always carries [`UNAVAILABLE`] as its value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementResult {
    name: Cow<'static, str>,
    value: i64,
    ok: bool,
}

impl MeasurementResult {
    /// A counted value. Counts beyond `i64::MAX` cannot be reported and
    /// become unavailable.
    pub fn available(name: impl Into<Cow<'static, str>>, count: u64) -> Self {
        match i64::try_from(count) {
            Ok(value) => Self {
                name: name.into(),
                value,
                ok: true,
            },
            Err(_) => Self::unavailable(name),
        }
    }

    pub fn unavailable(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            value: UNAVAILABLE,
            ok: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
