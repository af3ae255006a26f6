use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use perf_window::catalog::GENERIC;
use perf_window::count::UNAVAILABLE;
use perf_window::lifecycle::{EXIT_FAILED, EXIT_INTERRUPTED};

// Pinned to core 0 and busy for far longer than the test waits.
fn spawn_busy() -> Child {
    Command::new(env!("CARGO_BIN_EXE_perf-window"))
        .args(["0", "--iterations", "100000000000000"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn sigint(child: &Child) {
    let ret = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGINT) };
    assert_eq!(ret, 0);
}

fn wait_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(20));
    }
    None
}

#[test]
fn test_sigint_during_workload() {
    let mut child = spawn_busy();

    // A host without any usable counter ends the run before the workload.
    if let Some(status) = wait_timeout(&mut child, Duration::from_secs(1)) {
        assert_eq!(status.code(), Some(EXIT_FAILED));
        return;
    }

    // The second delivery lands while the first one is being finalized.
    sigint(&child);
    sigint(&child);

    let Some(status) = wait_timeout(&mut child, Duration::from_secs(30)) else {
        child.kill().unwrap();
        child.wait().unwrap();
        panic!("still running 30s after SIGINT");
    };
    assert_eq!(status.code(), Some(EXIT_INTERRUPTED));

    let mut out = String::new();
    child.stdout.take().unwrap().read_to_string(&mut out).unwrap();

    let lines: Vec<(&str, i64)> = out
        .lines()
        .map(|line| {
            let (name, value) = line.split_once(": ").unwrap();
            (name, value.parse().unwrap())
        })
        .collect();
    let names: Vec<_> = lines.iter().map(|(name, _)| *name).collect();
    let expected: Vec<_> = GENERIC.events.iter().map(|it| &*it.name).collect();
    assert_eq!(names, expected);
    assert!(lines.iter().all(|(_, value)| *value >= 0 || *value == UNAVAILABLE));
}

#[test]
fn test_unknown_catalog() {
    let status = Command::new(env!("CARGO_BIN_EXE_perf-window"))
        .args(["0", "--catalog", "pentium"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(EXIT_FAILED));
}
