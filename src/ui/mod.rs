use anyhow::Error;
use std::io::{self, Write};

use crate::core::Severity;
use crate::transforms::Transform;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(
        stderr,
        "  - see `vulnenrich --help` for available commands and options"
    );
}

/// Diagnostic line on stderr, shown only with `--verbose`.
pub fn note(cfg: &UiConfig, message: impl AsRef<str>) {
    if cfg.quiet || !cfg.verbose {
        return;
    }
    let _ = writeln!(io::stderr().lock(), "note: {}", message.as_ref());
}

pub fn print_transforms(cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let width = Transform::ALL
        .iter()
        .map(|t| t.name().len())
        .max()
        .unwrap_or(0);
    let mut out = io::stdout().lock();
    for t in Transform::ALL {
        let _ = writeln!(out, "{:<width$}  {}", t.name(), t.summary());
    }
}

pub fn print_severity(severity: Option<Severity>, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = match severity {
        Some(sev) => writeln!(out, "{} {}", sev.level(), sev),
        None => writeln!(out, "-"),
    };
}
