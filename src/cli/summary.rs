//! End-of-session migrations summary block.
//!
//! Rendered after the normal per-check listing and independent of it, so a
//! failing migrations check shows up twice: once as a failed check, once
//! here.

use crate::config::Configuration;
use crate::engine::plan::Synthesis;
use crate::engine::result::SessionSummary;
use std::fmt::{self, Write};

/// Width of separator lines
pub const LINE_WIDTH: usize = 80;

pub const HEADER: &str = "Pylembic migrations validation summary";
pub const FOOTER: &str = "End of Pylembic migrations validation summary";
pub const VERBOSE_HINT: &str = "Enable verbose mode with --pylembic-verbose for more details.";
pub const SUCCESS_LINE: &str = "✨ Migrations validation successful ✨";
pub const FAILURE_LINE: &str = "❌ Migrations validation failed ❌";

/// Renders the migrations summary block.
pub struct SummaryReporter {
    color: bool,
}

impl SummaryReporter {
    pub fn new(color: bool) -> Self {
        SummaryReporter { color }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    /// Write the block to `out`. Nothing is written when skip was requested.
    pub fn render(
        &self,
        out: &mut dyn Write,
        config: &Configuration,
        summary: &SessionSummary,
        synthesis: &Synthesis,
    ) -> fmt::Result {
        if config.skip {
            return Ok(());
        }

        writeln!(out, "{}", separator('=', HEADER))?;

        if !config.verbose {
            writeln!(out, "{}", VERBOSE_HINT)?;
        }

        if summary.ran {
            let line = if summary.passed {
                self.colorize(SUCCESS_LINE, "32")
            } else {
                self.colorize(FAILURE_LINE, "31")
            };
            writeln!(out)?;
            writeln!(out, "{}", line)?;
            if let Some(ref diagnostics) = summary.diagnostics {
                writeln!(out, "{}", diagnostics)?;
            }
        } else if let Synthesis::DirectoryAbsent { path } = synthesis {
            writeln!(
                out,
                "No migrations directory found at {}; validation not run.",
                path.display()
            )?;
        }

        writeln!(out, "{}", separator('=', FOOTER))
    }

    /// Render the block into a new string.
    pub fn render_to_string(
        &self,
        config: &Configuration,
        summary: &SessionSummary,
        synthesis: &Synthesis,
    ) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut output, config, summary, synthesis);
        output
    }
}

/// Build a `==== title ====` line of [`LINE_WIDTH`] characters.
pub fn separator(fill: char, title: &str) -> String {
    let title_width = title.chars().count() + 2;
    let side = LINE_WIDTH.saturating_sub(title_width) / 2;
    let bar: String = std::iter::repeat(fill).take(side.max(1)).collect();

    let mut line = format!("{} {} {}", bar, title, bar);
    while line.chars().count() < LINE_WIDTH {
        line.push(fill);
    }
    line
}
