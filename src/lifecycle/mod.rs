//! The measurement lifecycle.
//!
//! ```text
//! Uninitialized --arm--> Armed --finish/interrupt--> Quiesced --> Closed
//! ```
//!
//! Arming builds the [`PerfGroup`], resets and enables it. Leaving `Armed`
//! disables and reads the group, then releases it. Exactly one of the normal
//! return of the workload and an interrupt leaves `Armed`; whichever comes
//! second finds the measurement already finalized and does nothing.
//!
//! The controller is shared between the measuring thread and the interrupt
//! thread (see [`on_interrupt`]), so its state sits behind a mutex. The lock
//! is never held while the workload runs.


use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::Grouping;
use crate::count::group::PerfGroup;
use crate::count::{Backend, MeasurementResult};
use crate::error::{Chain, Error, Result};
use crate::event::EventDescriptor;

mod interrupt;

pub use interrupt::*;

/// Exit status of a run that ended normally.
pub const EXIT_COMPLETED: i32 = 0;
/// Exit status of a run that could not measure anything.
pub const EXIT_FAILED: i32 = 1;
/// Exit status of a run ended by `SIGINT`, following the shell's `128 + signal`.
pub const EXIT_INTERRUPTED: i32 = 128 + libc::SIGINT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    /// Counters are running.
    Armed,
    /// Counters are stopped and read.
    Quiesced,
    /// Counters are released. Terminal.
    Closed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Uninitialized => "uninitialized",
            State::Armed => "armed",
            State::Quiesced => "quiesced",
            State::Closed => "closed",
        })
    }
}

/// What ends the `Armed` state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The workload returned.
    Completed,
    /// An asynchronous interrupt arrived.
    Interrupt,
}

/// How a measurement ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
    /// No counter could be opened.
    Failed,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => EXIT_COMPLETED,
            Outcome::Interrupted => EXIT_INTERRUPTED,
            Outcome::Failed => EXIT_FAILED,
        }
    }
}

impl From<Trigger> for Outcome {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Completed => Outcome::Completed,
            Trigger::Interrupt => Outcome::Interrupted,
        }
    }
}

/// Result of [`Controller::interrupt`].
#[derive(Debug)]
pub enum Interruption {
    /// The interrupt finalized an armed measurement.
    Finalized(Vec<MeasurementResult>),
    /// Nothing was measured yet; the measurement will never arm.
    BeforeArm,
    /// The measurement was already finalized or finalizing.
    Ignored,
}

struct Inner<B: Backend> {
    state: State,
    outcome: Option<Outcome>,
    catalog: Vec<EventDescriptor>,
    grouping: Grouping,
    backend: Option<B>,
    group: Option<PerfGroup<B>>,
}

/// Drives one single-use measurement of a workload.
pub struct Controller<B: Backend> {
    inner: Mutex<Inner<B>>,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, catalog: impl Into<Vec<EventDescriptor>>, grouping: Grouping) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: State::Uninitialized,
                outcome: None,
                catalog: catalog.into(),
                grouping,
                backend: Some(backend),
                group: None,
            }),
        }
    }

    // Teardown must still run after a panic elsewhere, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner<B>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> State {
        self.lock().state
    }

    /// How the measurement ended, `None` while it has not.
    pub fn outcome(&self) -> Option<Outcome> {
        self.lock().outcome
    }

    /// Opens the counters, then resets and enables them.
    ///
    /// Failing to open any counter closes the measurement for good.
    pub fn arm(&self) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if inner.state != State::Uninitialized {
            return Err(Error::NotArmable(inner.state));
        }
        let Some(backend) = inner.backend.take() else {
            return Err(Error::NotArmable(inner.state));
        };

        let group = match PerfGroup::create(backend, &inner.catalog, inner.grouping) {
            Ok(group) => group,
            Err(err) => {
                inner.state = State::Closed;
                inner.outcome = Some(Outcome::Failed);
                return Err(err);
            }
        };

        if let Err(err) = group.reset() {
            warn!("{}", Chain(&err));
        }
        if let Err(err) = group.enable() {
            warn!("{}", Chain(&err));
        }
        inner.group = Some(group);
        inner.state = State::Armed;
        debug!("measurement armed");

        Ok(())
    }

    /// Leaves `Armed`: disables, reads and releases the counters.
    ///
    /// Returns `None` without doing anything if the measurement is not armed,
    /// e.g. because the other trigger got there first.
    pub fn finish(&self, trigger: Trigger) -> Option<Vec<MeasurementResult>> {
        Self::finalize(&mut self.lock(), trigger)
    }

    /// Handles an asynchronous interrupt.
    ///
    /// Safe to call any number of times and from any thread; only the first
    /// call on an armed measurement finalizes it.
    pub fn interrupt(&self) -> Interruption {
        let mut inner = self.lock();
        let state = inner.state;
        match state {
            State::Uninitialized => {
                inner.state = State::Closed;
                inner.outcome = Some(Outcome::Interrupted);
                inner.backend = None;
                debug!("interrupted before arming");
                Interruption::BeforeArm
            }
            State::Armed => match Self::finalize(&mut inner, Trigger::Interrupt) {
                Some(results) => Interruption::Finalized(results),
                None => Interruption::Ignored,
            },
            State::Quiesced | State::Closed => {
                debug!("interrupt ignored, measurement already {}", state);
                Interruption::Ignored
            }
        }
    }

    /// Arms, runs `workload`, then finishes.
    ///
    /// The workload does not run if arming fails. `Ok(None)` means an
    /// interrupt ended the measurement, either before it was armed or while
    /// the workload was running.
    pub fn run<F>(&self, workload: F) -> Result<Option<Vec<MeasurementResult>>>
    where
        F: FnOnce(),
    {
        match self.arm() {
            Ok(()) => {}
            Err(Error::NotArmable(_)) if self.outcome() == Some(Outcome::Interrupted) => {
                return Ok(None)
            }
            Err(err) => return Err(err),
        }
        workload();
        Ok(self.finish(Trigger::Completed))
    }

    fn finalize(inner: &mut Inner<B>, trigger: Trigger) -> Option<Vec<MeasurementResult>> {
        if inner.state != State::Armed {
            debug!(?trigger, "finalization skipped, measurement {}", inner.state);
            return None;
        }
        let mut group = inner.group.take()?;

        if let Err(err) = group.disable() {
            warn!("{}", Chain(&err));
        }
        let results = group.read();
        inner.state = State::Quiesced;
        debug!(?trigger, "measurement quiesced");

        group.close();
        inner.state = State::Closed;
        inner.outcome = Some(trigger.into());

        Some(results)
    }
}

impl<B: Backend> fmt::Debug for Controller<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Controller")
            .field("state", &inner.state)
            .field("outcome", &inner.outcome)
            .field("events", &inner.catalog.len())
            .finish()
    }
}
