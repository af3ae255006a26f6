use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use perf_window::affinity;
use perf_window::catalog::{self, Catalog};
use perf_window::config::{Cpu, Grouping, Opts, Target};
use perf_window::count::PerfBackend;
use perf_window::lifecycle::{self, Controller, EXIT_FAILED};
use perf_window::report::Reporter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perf-window")]
#[command(version)]
#[command(about = "Count hardware events of a workload pinned to one CPU core")]
struct Cli {
    /// CPU core to pin the measurement to
    cpu: u32,

    /// Event catalog to measure [possible values: generic, cortex-a72]
    #[arg(long, default_value = "generic", value_parser = parse_catalog)]
    catalog: Catalog,

    /// Control every counter on its own instead of through a group leader
    #[arg(long)]
    independent: bool,

    /// Busy-loop iterations run as the measured workload (0 measures nothing)
    #[arg(long, default_value_t = 0)]
    iterations: u64,
}

fn parse_catalog(name: &str) -> Result<Catalog, String> {
    catalog::by_name(name).copied().ok_or_else(|| {
        let known: Vec<_> = catalog::ALL.iter().map(|it| it.name).collect();
        format!("unknown catalog, expected one of: {}", known.join(", "))
    })
}

fn workload(iterations: u64) {
    let mut acc = 0u64;
    for i in 0..iterations {
        acc = std::hint::black_box(acc.wrapping_add(i));
    }
    std::hint::black_box(acc);
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Installed before pinning so the interrupt thread is neither bound to
    // the measured core nor competing with it at real-time priority.
    let slot = lifecycle::finalize_on_interrupt::<PerfBackend, _>(|results| {
        if let Err(err) = Reporter::stdout().report(results) {
            eprintln!("error: failed to write report: {}", err);
        }
    })?;

    let cpu = Cpu(cli.cpu);
    let pinning = affinity::pin(cpu);

    let catalog = cli.catalog;
    let opts = Opts {
        exclude: catalog.exclude,
        grouping: match cli.independent {
            true => Grouping::Independent,
            false => Grouping::Leader,
        },
        ..Default::default()
    };
    let target = Target::current(pinning.counter_cpu(cpu));
    let backend = PerfBackend::new(target, opts.clone());
    let controller = Arc::new(Controller::new(backend, catalog.events, opts.grouping));
    if !slot.fill(Arc::clone(&controller)) {
        wait_for_exit();
    }

    let iterations = cli.iterations;
    let finished = controller
        .run(|| workload(iterations))
        .with_context(|| format!("cannot measure catalog `{}`", catalog.name))?;

    match finished {
        Some(results) => {
            Reporter::stdout()
                .report(&results)
                .context("failed to write report")?;
            Ok(ExitCode::SUCCESS)
        }
        None => wait_for_exit(),
    }
}

/// Parks until the interrupt thread, which owns the exit, ends the process.
fn wait_for_exit() -> ! {
    loop {
        thread::park();
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("perf_window=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.use_stderr() {
                true => ExitCode::from(EXIT_FAILED as u8),
                false => ExitCode::SUCCESS,
            };
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(EXIT_FAILED as u8)
        }
    }
}
