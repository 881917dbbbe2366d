//! Terminal output for portal commands
//!
//! Failures go to stderr so `--json` output on stdout stays parseable.

use std::fmt::Display;

use console::{style, StyledObject};

/// Leading status glyph
enum Mark {
    Done,
    Failed,
    Note,
}

impl Mark {
    fn glyph(&self) -> StyledObject<&'static str> {
        match self {
            Mark::Done => style("✓").green().bold(),
            Mark::Failed => style("✗").red().bold(),
            Mark::Note => style("ℹ").blue().bold(),
        }
    }
}

pub fn success(msg: &str) {
    println!("{} {}", Mark::Done.glyph(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", Mark::Failed.glyph(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", Mark::Note.glyph(), msg);
}

/// Underlined section title preceded by a blank line
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Indented, aligned `key: value` line
pub fn kv(key: &str, value: impl Display) {
    let label = format!("{}:", key);
    println!("  {} {}", style(format!("{:<12}", label)).dim(), value);
}

/// One-line revalidation verdict for a view
pub fn decision(view: &str, action: Option<&str>, revalidate: bool) {
    let action = action.unwrap_or("no action");
    if revalidate {
        println!("{} {} after {}: refetch loader data", Mark::Note.glyph(), view, action);
    } else {
        println!("{} {} after {}: keep loader data", Mark::Done.glyph(), view, action);
    }
}
