use std::io;

use thiserror::Error;

use crate::count::Control;
use crate::lifecycle::State;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A single counter could not be opened. Recoverable: that counter is
    /// reported unavailable.
    #[error("failed to open counter `{name}`")]
    CounterOpen {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Not a single counter of the catalog could be opened.
    #[error("no counter of the catalog could be opened")]
    NoCountersAvailable,

    /// Reading a counter failed. Recoverable: that counter is reported unavailable.
    #[error("failed to read counter `{name}`")]
    CounterRead {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A reset, enable or disable request was rejected.
    #[error("failed to {op} counter `{name}`")]
    Control {
        op: Control,
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to pin thread to CPU {cpu}")]
    AffinitySet {
        cpu: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to raise scheduling priority")]
    PriorityElevation {
        #[source]
        source: io::Error,
    },

    /// A measurement is single-use and only arms from its initial state.
    #[error("measurement cannot be armed once {0}")]
    NotArmable(State),

    #[error("failed to install interrupt handler")]
    Interrupt(#[from] ctrlc::Error),
}

impl Error {
    /// Whether the run can go on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::NoCountersAvailable | Error::NotArmable(_) | Error::Interrupt(_)
        )
    }
}

/// Displays an error followed by its chain of sources, `a: b: c`.
pub struct Chain<'a>(pub &'a (dyn std::error::Error + 'static));

impl std::fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(it) = source {
            write!(f, ": {}", it)?;
            source = it.source();
        }
        Ok(())
    }
}
