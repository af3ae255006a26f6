use std::process;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::{Controller, Interruption, EXIT_INTERRUPTED};
use crate::count::{Backend, MeasurementResult};
use crate::error::Result;

/// Where the interrupt hook finds the measurement to finalize.
///
/// The hook is installed before the controller exists. An interrupt that
/// finds the slot empty claims it, so the controller can no longer be handed
/// over and must not be armed.
pub struct ControllerSlot<B: Backend>(OnceLock<Option<Arc<Controller<B>>>>);

impl<B: Backend> ControllerSlot<B> {
    pub fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Hands `controller` to the interrupt hook.
    ///
    /// Returns `false` if an interrupt came first.
    pub fn fill(&self, controller: Arc<Controller<B>>) -> bool {
        self.0.set(Some(controller)).is_ok()
    }

    pub fn interrupt(&self) -> Interruption {
        match self.0.get_or_init(|| None) {
            Some(controller) => controller.interrupt(),
            None => {
                debug!("interrupted before the measurement was set up");
                Interruption::BeforeArm
            }
        }
    }
}

impl<B: Backend> Default for ControllerSlot<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `handler` on every `SIGINT`.
///
/// The raw signal handler installed by `ctrlc` only wakes a dedicated thread,
/// and `handler` runs on that thread, so it may lock, allocate and print.
/// Deliveries are handled one after another. Can be installed once per process.
///
/// The thread is spawned here and inherits the caller's affinity and
/// scheduling policy, so install the hook before [`pin`][crate::affinity::pin].
pub fn on_interrupt<F>(handler: F) -> Result<()>
where
    F: FnMut() + Send + 'static,
{
    ctrlc::set_handler(handler)?;
    Ok(())
}

/// Installs a hook that finalizes the controller put in the returned slot on
/// `SIGINT`, hands the results to `report`, then exits with
/// [`EXIT_INTERRUPTED`].
///
/// An interrupt arriving once the measurement is already finalizing is
/// ignored, and the normal path keeps ownership of the exit.
pub fn finalize_on_interrupt<B, R>(mut report: R) -> Result<Arc<ControllerSlot<B>>>
where
    B: Backend + Send + 'static,
    B::Counter: Send,
    R: FnMut(&[MeasurementResult]) + Send + 'static,
{
    let slot = Arc::new(ControllerSlot::new());
    let hook = Arc::clone(&slot);

    on_interrupt(move || match hook.interrupt() {
        Interruption::Finalized(results) => {
            report(&results);
            process::exit(EXIT_INTERRUPTED);
        }
        Interruption::BeforeArm => process::exit(EXIT_INTERRUPTED),
        Interruption::Ignored => debug!("interrupt ignored"),
    })?;

    Ok(slot)
}
