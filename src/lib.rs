//! Measure a unit of work with a group of `perf_event_open` counters.
//!
//! Counters from a static catalog are opened as one group behind a leader, so
//! that a single request resets, starts or stops all of them at once. Counters
//! that fail to open are reported as `-1` instead of aborting the measurement,
//! and teardown runs exactly once even if `SIGINT` arrives mid-measurement.
//!
//! ## Example
//!
//! Count branches and branch misses of an (inefficient) fibonacci calculation.
//!
//! ```rust,no_run
//! use perf_window::config::{Grouping, Opts, Target};
//! use perf_window::count::PerfBackend;
//! use perf_window::event::hw::Hardware;
//! use perf_window::event::EventDescriptor;
//! use perf_window::lifecycle::Controller;
//! use perf_window::report::Reporter;
//!
//! let catalog = vec![
//!     EventDescriptor::new("branches", Hardware::BranchInstr.event()),
//!     EventDescriptor::new("misses", Hardware::BranchMiss.event()),
//! ];
//! let backend = PerfBackend::new(Target::current(None), Opts::default());
//! let controller = Controller::new(backend, catalog, Grouping::Leader);
//!
//! fn fib(n: usize) -> usize {
//!     match n {
//!         0 => 0,
//!         1 => 1,
//!         n => fib(n - 1) + fib(n - 2),
//!     }
//! }
//! let results = controller
//!     .run(|| {
//!         std::hint::black_box(fib(30));
//!     })
//!     .unwrap()
//!     .unwrap();
//!
//! Reporter::stdout().report(&results).unwrap();
//! ```
//!
//! ## Platform
//!
//! Linux only. Opening hardware counters usually requires
//! `/proc/sys/kernel/perf_event_paranoid` to be 2 or lower.

pub mod affinity;
pub mod catalog;
pub mod config;
pub mod count;
pub mod error;
pub mod event;
mod ffi;
pub mod lifecycle;
pub mod report;

pub use error::{Error, Result};
