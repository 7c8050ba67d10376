//! Colored terminal summary output for the CLI's final report line.
//!
//! Grounded on `examples/maskdotdev-sombra/src/bin/cli/ui.rs`'s `Ui`
//! struct: auto-detect whether stdout is a terminal, paint only when it
//! is (and the caller hasn't asked for plain output), and fall back to
//! the teacher's own Windows ANSI-support enable call.

use std::io::IsTerminal;

use nu_ansi_term::{Color, Style};

/// Minimal colored-output helper for the post-run summary. Painting is
/// disabled automatically when stdout isn't a terminal (e.g. piped to a
/// file or CI log), matching the teacher's `Ui::new` auto-detection.
pub struct Ui {
    paint: bool,
}

impl Ui {
    /// Builds a `Ui` that paints iff stdout is a terminal and `plain` is
    /// false.
    pub fn new(plain: bool) -> Self {
        let paint = std::io::stdout().is_terminal() && !plain;

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self { paint }
    }

    /// Styles `archive_id` as a bold heading for the summary's first
    /// line.
    pub fn heading(&self, archive_id: &str) -> String {
        if self.paint {
            Style::new().bold().paint(archive_id).to_string()
        } else {
            archive_id.to_string()
        }
    }

    /// Styles a `label: value` field, coloring the value green.
    pub fn field(&self, label: &str, value: impl std::fmt::Display) -> String {
        if self.paint {
            format!("{}: {}", label, Color::Green.paint(value.to_string()))
        } else {
            format!("{label}: {value}")
        }
    }
}
