//! Startup banner.

use console::style;

const RULE: &str = "============================================================";

/// Print the startup banner to stderr, keeping stdout clean for results.
pub fn print_banner() {
    let art = [
        r"     ___  ___  _   _ _  _ ___  ___ ___ ",
        r"    / __|/ _ \| | | | \| |   \| __| _ \",
        r"    \__ \ (_) | |_| | .` | |) | _||   /",
        r"    |___/\___/ \___/|_|\_|___/|___|_|_\",
    ];

    eprintln!("{}", style(RULE).cyan());
    for line in art {
        eprintln!("{}", style(line).magenta().bold());
    }
    eprintln!(
        "{}",
        style(format!(
            "         HTTP probing tool v{}",
            env!("CARGO_PKG_VERSION")
        ))
        .yellow()
        .bold()
    );
    eprintln!(
        "{}",
        style("      fast, concurrent HTTP/HTTPS recon").blue()
    );
    eprintln!("{}", style(RULE).cyan());
}
