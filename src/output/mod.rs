//! Output formatting module.
//!
//! Formatters for colored text, JSON lines, and CSV renditions of probe
//! results, plus output-file writing. Status messages go to stderr so
//! stdout stays machine-parseable.

pub mod csv_format;
pub mod json_format;
pub mod plain;

use crate::cli::Args;
use crate::error::{CliError, CliResult};
use crate::probe::ProbeResult;
use console::style;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Decide whether a result appears in rendered output.
///
/// Failed probes appear only in verbose mode.
pub fn include(result: &ProbeResult, verbose: bool) -> bool {
    result.probe_status || verbose
}

/// Print results to stdout in the format selected by the CLI flags.
pub fn print_results(results: &[ProbeResult], args: &Args) -> CliResult<()> {
    if args.json {
        json_format::print_json(results, args.verbose)?;
    } else if args.csv {
        csv_format::print_csv(io::stdout().lock(), results, args.verbose)?;
    } else {
        plain::print_plain(results, args)?;
    }
    Ok(())
}

/// Write results to a file.
///
/// JSON mode writes one object per line for every result; CSV mode writes
/// the full table under the usual verbose rule; text mode writes just the
/// live URLs, one per line, ready to pipe into other tools.
pub fn write_output(path: &Path, results: &[ProbeResult], args: &Args) -> CliResult<()> {
    if args.json {
        let file = File::create(path).map_err(|e| write_error(path, e))?;
        let mut out = BufWriter::new(file);
        for result in results {
            let line = serde_json::to_string(result).map_err(|e| write_error(path, e))?;
            writeln!(out, "{}", line).map_err(|e| write_error(path, e))?;
        }
        out.flush().map_err(|e| write_error(path, e))?;
    } else if args.csv {
        let file = File::create(path).map_err(|e| write_error(path, e))?;
        csv_format::print_csv(file, results, args.verbose).map_err(|e| write_error(path, e))?;
    } else {
        let file = File::create(path).map_err(|e| write_error(path, e))?;
        let mut out = BufWriter::new(file);
        for result in results.iter().filter(|r| r.probe_status) {
            writeln!(out, "{}", result.url).map_err(|e| write_error(path, e))?;
        }
        out.flush().map_err(|e| write_error(path, e))?;
    }
    Ok(())
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> CliError {
    CliError::OutputWrite {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Print an informational status message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("[+]").cyan().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}
