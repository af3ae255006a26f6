#[cfg(test)]
mod test;

use std::fmt;

use tracing::{debug, warn};

use super::{Backend, Control, MeasurementResult, Scope};
use crate::config::Grouping;
use crate::error::{Chain, Error, Result};
use crate::event::EventDescriptor;

/// One catalog entry and its counter, if the counter could be opened.
///
/// A handle without a resource is never reset, enabled, disabled or read.
#[derive(Debug)]
pub struct CounterHandle<C> {
    event: EventDescriptor,
    resource: Option<C>,
}

impl<C> CounterHandle<C> {
    pub fn event(&self) -> &EventDescriptor {
        &self.event
    }

    pub fn is_valid(&self) -> bool {
        self.resource.is_some()
    }

    pub fn resource(&self) -> Option<&C> {
        self.resource.as_ref()
    }
}

/// The counters of one measurement, in catalog order.
///
/// An event group is scheduled onto the CPU as a unit: it will be put onto
/// the CPU only if all of the events in the group can be put onto the CPU.
/// With [`Grouping::Leader`] every member is started and stopped by a single
/// request on the leader, so the counts of all members cover the same set
/// of executed instructions.
///
/// With [`Grouping::Independent`], or when the backend cannot group, every
/// valid counter is controlled on its own and the counts may be skewed by
/// the time between two requests.
///
/// A group is single-use: once [closed][Self::close] it holds no counters.
/// Dropping the group closes it.
pub struct PerfGroup<B: Backend> {
    backend: B,
    handles: Vec<CounterHandle<B::Counter>>,
    leader: usize,
    grouping: Grouping,
}

impl<B: Backend> PerfGroup<B> {
    /// Opens one counter per descriptor, in order.
    ///
    /// The first counter that opens becomes the leader. A counter that fails
    /// to open is kept as an invalid handle and reported unavailable; only a
    /// catalog where nothing opens is an error.
    pub fn create(backend: B, catalog: &[EventDescriptor], grouping: Grouping) -> Result<Self> {
        let grouping = match grouping {
            Grouping::Leader if !backend.supports_grouping() => {
                debug!("counter grouping unsupported, controlling counters one by one");
                Grouping::Independent
            }
            it => it,
        };

        let mut handles: Vec<CounterHandle<B::Counter>> = Vec::with_capacity(catalog.len());
        let mut leader: Option<usize> = None;

        for event in catalog {
            let group_leader = match (grouping, leader) {
                (Grouping::Leader, Some(i)) => handles[i].resource.as_ref(),
                _ => None,
            };

            let resource = match backend.open(event, group_leader) {
                Ok(counter) => {
                    debug!(counter = %event, leader = leader.is_none(), "counter opened");
                    leader.get_or_insert(handles.len());
                    Some(counter)
                }
                Err(source) => {
                    let err = Error::CounterOpen {
                        name: event.name.to_string(),
                        source,
                    };
                    warn!("{}", Chain(&err));
                    None
                }
            };

            handles.push(CounterHandle {
                event: event.clone(),
                resource,
            });
        }

        let Some(leader) = leader else {
            return Err(Error::NoCountersAvailable);
        };

        Ok(Self {
            backend,
            handles,
            leader,
            grouping,
        })
    }

    /// Returns the handles in catalog order.
    pub fn handles(&self) -> &[CounterHandle<B::Counter>] {
        &self.handles
    }

    /// Returns the catalog index of the leader.
    pub fn leader(&self) -> usize {
        self.leader
    }

    /// Returns the effective grouping, which falls back to
    /// [`Grouping::Independent`] when the backend cannot group.
    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of handles, which is the catalog length.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether every counter has been released.
    pub fn is_closed(&self) -> bool {
        self.handles.iter().all(|it| !it.is_valid())
    }

    /// Clears the counts of all counters.
    pub fn reset(&self) -> Result<()> {
        self.control(Control::Reset)
    }

    /// Starts all counters.
    pub fn enable(&self) -> Result<()> {
        self.control(Control::Enable)
    }

    /// Stops all counters.
    pub fn disable(&self) -> Result<()> {
        self.control(Control::Disable)
    }

    /// Applies `op` through the leader when grouped, otherwise to every
    /// valid handle. Every handle is attempted; the first failure is returned.
    fn control(&self, op: Control) -> Result<()> {
        let (handles, scope) = match self.grouping {
            Grouping::Leader => (&self.handles[self.leader..=self.leader], Scope::Group),
            Grouping::Independent => (&self.handles[..], Scope::Single),
        };

        let mut first = None;
        for handle in handles {
            let Some(counter) = handle.resource.as_ref() else {
                continue;
            };
            if let Err(source) = self.backend.control(counter, op, scope) {
                let err = Error::Control {
                    op,
                    name: handle.event.name.to_string(),
                    source,
                };
                first.get_or_insert(err);
            }
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reads every counter in catalog order.
    ///
    /// Call this after [`disable`][Self::disable] so the counts no longer
    /// move. Invalid handles and failed reads yield unavailable results.
    pub fn read(&self) -> Vec<MeasurementResult> {
        self.handles
            .iter()
            .map(|handle| {
                let name = handle.event.name.clone();
                let Some(counter) = handle.resource.as_ref() else {
                    return MeasurementResult::unavailable(name);
                };

                match self.backend.read(counter) {
                    Ok(stat) => {
                        if stat.never_scheduled() {
                            warn!("counter `{}` was never scheduled on the PMU", name);
                        }
                        let result = MeasurementResult::available(name, stat.count);
                        if !result.is_ok() {
                            warn!("count of `{}` overflows a signed 64-bit value", result.name());
                        }
                        result
                    }
                    Err(source) => {
                        let err = Error::CounterRead {
                            name: name.to_string(),
                            source,
                        };
                        warn!("{}", Chain(&err));
                        MeasurementResult::unavailable(name)
                    }
                }
            })
            .collect()
    }

    /// Releases every counter, members before the leader.
    ///
    /// Calling this again, or on a group whose handles are all invalid,
    /// does nothing.
    pub fn close(&mut self) {
        let leader = self.leader;
        let backend = &self.backend;
        let handles = &mut self.handles;

        let members = handles
            .iter_mut()
            .enumerate()
            .rev()
            .filter(|(i, _)| *i != leader)
            .map(|(_, it)| it);
        for handle in members {
            if let Some(counter) = handle.resource.take() {
                backend.close(counter);
            }
        }
        if let Some(counter) = handles[leader].resource.take() {
            backend.close(counter);
        }
    }
}

impl<B: Backend> fmt::Debug for PerfGroup<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid = self.handles.iter().filter(|it| it.is_valid()).count();
        f.debug_struct("PerfGroup")
            .field("len", &self.handles.len())
            .field("valid", &valid)
            .field("leader", &self.leader)
            .field("grouping", &self.grouping)
            .finish()
    }
}

impl<B: Backend> Drop for PerfGroup<B> {
    fn drop(&mut self) {
        self.close();
    }
}
