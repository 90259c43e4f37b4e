//! Startup banner for interactive terminal sessions.

use std::io::IsTerminal;

struct Colors {
    accent: &'static str,
    dim: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    accent: "\x1b[1;38;2;120;170;220m",
    dim: "\x1b[38;2;110;110;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    accent: "",
    dim: "",
    reset: "",
};

/// Prints a one-line startup banner, colored when stdout is a terminal.
pub fn print_banner(version: &str) {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };
    println!(
        "{}marketarb{} {}v{version}{} — cross-venue prediction-market arbitrage scanner",
        c.accent, c.reset, c.dim, c.reset
    );
}
