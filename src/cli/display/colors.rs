//! Color mapping for reconciliation output.
//!
//! `console` disables styling automatically when the stream is not a
//! terminal or `NO_COLOR` is set.

use console::{style, StyledObject};

use crate::domain::models::ChangeKind;

/// Diff marker for one assignee line.
///
/// `+` green, `-` red, `=` blue; all bold.
pub fn diff_marker(kind: ChangeKind) -> StyledObject<&'static str> {
    match kind {
        ChangeKind::Added => style("+").green().bold(),
        ChangeKind::Removed => style("-").red().bold(),
        ChangeKind::Kept => style("=").blue().bold(),
    }
}

pub fn error_tag() -> StyledObject<&'static str> {
    style("ERROR").red().bold()
}

pub fn fallback_tag() -> StyledObject<&'static str> {
    style("FALLBACK").yellow().bold()
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}
