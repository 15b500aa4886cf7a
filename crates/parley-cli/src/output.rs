//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;
use crate::session::{Outcome, SessionReport};

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for SessionReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Session {}", self.id)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Domain:           {}", self.domain)?;
        for (id, description) in self.parties.iter().zip(&self.descriptions) {
            writeln!(writer, "Party:            {id} ({description})")?;
        }
        writeln!(writer, "Rounds:           {} / {}", self.rounds_used, self.deadline)?;
        writeln!(writer)?;
        match &self.outcome {
            Outcome::Agreement { bid, utilities } => {
                writeln!(writer, "Outcome:          agreement")?;
                writeln!(writer, "  Bid:            {bid}")?;
                for (id, utility) in self.parties.iter().zip(utilities) {
                    writeln!(writer, "  Utility {id:<7} {utility:.4}")?;
                }
            }
            Outcome::Ended { by } => writeln!(writer, "Outcome:          ended by {by}")?,
            Outcome::Deadline => writeln!(writer, "Outcome:          no agreement (deadline)")?,
        }

        if !self.trace.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "{:<7} {:<40} {:>8} {:>8}", "ROUND", "ACTION", "U(A)", "U(B)")?;
            for entry in &self.trace {
                let (a, b) = entry
                    .utilities
                    .map_or((String::from("-"), String::from("-")), |[a, b]| {
                        (format!("{a:.4}"), format!("{b:.4}"))
                    });
                writeln!(
                    writer,
                    "{:<7} {:<40} {a:>8} {b:>8}",
                    entry.round,
                    entry.action.to_string()
                )?;
            }
        }
        Ok(())
    }
}

/// Expected-utility targets for display.
#[derive(Debug, Clone, Serialize)]
pub struct TargetTable {
    /// Reservation utility at zero rounds remaining.
    pub reservation: f64,
    /// Rows of (rounds remaining, target).
    pub rows: Vec<TargetRow>,
}

/// One row of a [`TargetTable`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TargetRow {
    /// Rounds remaining.
    pub remaining: u32,
    /// Target utility.
    pub target: f64,
}

impl TableDisplay for TargetTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Expected utility (reservation {:.4})", self.reservation)?;
        writeln!(writer, "{:<12} {:>8}", "REMAINING", "TARGET")?;
        for row in &self.rows {
            writeln!(writer, "{:<12} {:>8.4}", row.remaining, row.target)?;
        }
        Ok(())
    }
}
