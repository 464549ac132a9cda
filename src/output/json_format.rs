//! JSON Lines output.

use crate::output::include;
use crate::probe::ProbeResult;
use std::io::{self, Write};

/// Print one compact JSON object per included result.
pub fn print_json(results: &[ProbeResult], verbose: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for result in results.iter().filter(|r| include(r, verbose)) {
        let line = serde_json::to_string(result).map_err(io::Error::other)?;
        writeln!(out, "{}", line)?;
    }

    Ok(())
}
