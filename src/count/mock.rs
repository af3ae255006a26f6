use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind, Result};
use std::sync::{Arc, Mutex};

use super::{Backend, Control, Scope, Stat};
use crate::event::hw::Hardware;
use crate::event::EventDescriptor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Open { name: String, leader: Option<String> },
    Control { op: Control, scope: Scope, name: String },
    Read(String),
    Close(String),
}

#[derive(Debug)]
pub(crate) struct MockCounter {
    name: String,
}

/// Records every backend call so tests can assert on what was touched.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockBackend {
    pub no_grouping: bool,
    pub fail_open: HashSet<String>,
    pub fail_read: HashSet<String>,
    pub counts: HashMap<String, u64>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockBackend {
    pub fn failing_open(names: &[&str]) -> Self {
        Self {
            fail_open: names.iter().map(|it| it.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn controls(&self, op: Control) -> Vec<(Scope, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Control {
                    op: it,
                    scope,
                    name,
                } if it == op => Some((scope, name)),
                _ => None,
            })
            .collect()
    }

    /// Every call that touched the counter called `name`, opening aside.
    pub fn touching(&self, name: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::Open { .. } => false,
                Call::Control { name: it, .. } | Call::Read(it) | Call::Close(it) => it == name,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Close(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for MockBackend {
    type Counter = MockCounter;

    fn supports_grouping(&self) -> bool {
        !self.no_grouping
    }

    fn open(&self, event: &EventDescriptor, leader: Option<&MockCounter>) -> Result<MockCounter> {
        let name = event.name.to_string();
        self.record(Call::Open {
            name: name.clone(),
            leader: leader.map(|it| it.name.clone()),
        });
        if self.fail_open.contains(&name) {
            return Err(Error::from(ErrorKind::PermissionDenied));
        }
        Ok(MockCounter { name })
    }

    fn control(&self, counter: &MockCounter, op: Control, scope: Scope) -> Result<()> {
        self.record(Call::Control {
            op,
            scope,
            name: counter.name.clone(),
        });
        Ok(())
    }

    fn read(&self, counter: &MockCounter) -> Result<Stat> {
        self.record(Call::Read(counter.name.clone()));
        if self.fail_read.contains(&counter.name) {
            return Err(Error::from(ErrorKind::Interrupted));
        }
        Ok(Stat {
            count: self.counts.get(&counter.name).copied().unwrap_or(100),
            ..Default::default()
        })
    }

    fn close(&self, counter: MockCounter) {
        self.record(Call::Close(counter.name));
    }
}

pub(crate) fn catalog(names: &[&'static str]) -> Vec<EventDescriptor> {
    names
        .iter()
        .map(|name| EventDescriptor::new(*name, Hardware::Instr.event()))
        .collect()
}
