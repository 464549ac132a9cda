//! Colored plain-text output.
//!
//! One line per live URL with bracketed, color-coded segments for each
//! selected probe flag, in fixed order: status code, content length, title,
//! server, response time.

use crate::cli::Args;
use crate::probe::ProbeResult;
use console::{style, Style};
use std::io::{self, Write};

/// Titles longer than this are truncated with an ellipsis.
const TITLE_MAX: usize = 50;

/// Print results as colored per-URL lines.
pub fn print_plain(results: &[ProbeResult], args: &Args) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for result in results {
        if result.probe_status {
            writeln!(out, "{}", format_line(result, args))?;
        } else if args.verbose {
            if let Some(error) = &result.error {
                writeln!(
                    out,
                    "{} {}",
                    style(&result.url).cyan(),
                    style(format!("[ERROR: {}]", error)).red()
                )?;
            }
        }
    }

    Ok(())
}

/// Assemble the display line for a live result.
fn format_line(result: &ProbeResult, args: &Args) -> String {
    let mut line = style(&result.url).cyan().to_string();

    if args.status_code {
        if let Some(code) = result.status_code {
            let segment = status_style(code).apply_to(format!("[{}]", code));
            line.push_str(&format!(" {}", segment));
        }
    }

    if args.content_length {
        if let Some(length) = result.content_length {
            line.push_str(&format!(" {}", style(format!("[{}]", length)).blue()));
        }
    }

    if args.title {
        if let Some(title) = &result.title {
            let segment = style(format!("[{}]", truncate_title(title))).magenta();
            line.push_str(&format!(" {}", segment));
        }
    }

    if args.server {
        if let Some(server) = &result.server {
            line.push_str(&format!(" {}", style(format!("[{}]", server)).yellow()));
        }
    }

    if args.response_time {
        if let Some(seconds) = result.response_time {
            let segment = time_style(seconds).apply_to(format!("[{:.2}s]", seconds));
            line.push_str(&format!(" {}", segment));
        }
    }

    line
}

/// Color by status code class.
fn status_style(code: u16) -> Style {
    match code {
        200..=299 => Style::new().green(),
        300..=399 => Style::new().yellow(),
        400..=499 => Style::new().red(),
        500..=599 => Style::new().magenta(),
        _ => Style::new().white(),
    }
}

/// Color by response speed.
fn time_style(seconds: f64) -> Style {
    if seconds < 1.0 {
        Style::new().green()
    } else if seconds < 3.0 {
        Style::new().yellow()
    } else {
        Style::new().red()
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_MAX {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(TITLE_MAX).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args_with(extra: &[&str]) -> Args {
        let mut argv = vec!["sounder", "-u", "example.com"];
        argv.extend(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn live_result() -> ProbeResult {
        let mut result = ProbeResult::new("http://example.com");
        result.probe_status = true;
        result.status_code = Some(200);
        result.title = Some("Example Domain".to_string());
        result.server = Some("nginx".to_string());
        result.response_time = Some(0.42);
        result
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short"), "short");
        let long = "x".repeat(60);
        let truncated = truncate_title(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), TITLE_MAX + 3);
    }

    #[test]
    fn test_format_line_includes_selected_segments() {
        let args = args_with(&["--status-code", "--title", "--response-time"]);
        let line = format_line(&live_result(), &args);
        assert!(line.contains("http://example.com"));
        assert!(line.contains("[200]"));
        assert!(line.contains("[Example Domain]"));
        assert!(line.contains("[0.42s]"));
        // Unselected segments stay out
        assert!(!line.contains("[nginx]"));
    }

    #[test]
    fn test_format_line_skips_unset_fields() {
        let args = args_with(&["--status-code", "--content-length"]);
        let mut result = live_result();
        result.content_length = None;
        let line = format_line(&result, &args);
        assert!(line.contains("[200]"));
        assert!(!line.contains("[]"));
    }
}
