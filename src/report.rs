use std::io::{self, Stdout, Write};

use crate::count::MeasurementResult;

/// Writes measurement results as `<name>: <value>` lines.
///
/// Every result gets its line, unavailable ones included (with value `-1`),
/// so a report always has one line per catalog entry, in catalog order.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn report(&mut self, results: &[MeasurementResult]) -> io::Result<()> {
        for result in results {
            writeln!(self.out, "{}", result)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
