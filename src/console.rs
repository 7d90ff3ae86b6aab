//! Categorised, coloured progress lines on stderr.

use colored::Colorize;

pub fn info(msg: &str) {
    eprintln!("{} {msg}", "[INFO]".blue().bold());
}

pub fn success(msg: &str) {
    eprintln!("{} {msg}", "[OK]".green().bold());
}

pub fn warn(msg: &str) {
    eprintln!("{} {msg}", "[WARN]".yellow().bold());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", "[ERROR]".red().bold());
}

/// Print a phase banner.
pub fn section(title: &str) {
    eprintln!();
    eprintln!("{}", format!("==> {title}").cyan().bold());
}

/// Pass/fail marker used by the status report.
#[must_use]
pub fn check_mark(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
