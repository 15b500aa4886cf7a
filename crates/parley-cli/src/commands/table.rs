//! Expected-utility table command.

use std::io::Write;

use parley_agent::{ExpectedUtilityTable, MAX_DEADLINE_ROUNDS};

use crate::cli::TableArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TargetRow, TargetTable};

/// Table command executor.
pub struct TableCommand;

impl TableCommand {
    /// Builds the rows selected by `args`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation lies outside `[0, 1]`, the step is
    /// zero, or the round count exceeds [`MAX_DEADLINE_ROUNDS`].
    pub fn build(args: &TableArgs) -> Result<TargetTable, CliError> {
        if !(0.0..=1.0).contains(&args.reservation) {
            return Err(CliError::InvalidArgument(format!(
                "reservation {} is outside [0, 1]",
                args.reservation
            )));
        }
        if args.step == 0 {
            return Err(CliError::InvalidArgument("step must be positive".to_string()));
        }
        if args.rounds > MAX_DEADLINE_ROUNDS {
            return Err(CliError::InvalidArgument(format!(
                "{} rounds exceeds the {MAX_DEADLINE_ROUNDS}-round limit",
                args.rounds
            )));
        }

        let table = ExpectedUtilityTable::new(args.reservation, args.rounds);
        let mut rows: Vec<TargetRow> = (0..=args.rounds)
            .step_by(args.step as usize)
            .map(|remaining| TargetRow {
                remaining,
                target: table.get(remaining),
            })
            .collect();
        if rows.last().is_some_and(|row| row.remaining != args.rounds) {
            rows.push(TargetRow {
                remaining: args.rounds,
                target: table.get(args.rounds),
            });
        }
        Ok(TargetTable {
            reservation: args.reservation,
            rows,
        })
    }

    /// Execute the table command.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or output fails.
    pub fn execute<W: Write>(
        writer: &mut W,
        format: &OutputFormat,
        args: &TableArgs,
    ) -> Result<(), CliError> {
        let table = Self::build(args)?;
        format.write(writer, &table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(reservation: f64, rounds: u32, step: u32) -> TableArgs {
        TableArgs {
            reservation,
            rounds,
            step,
        }
    }

    #[test]
    fn rows_follow_step_and_include_last() {
        let table = TableCommand::build(&args(0.2, 25, 10)).unwrap();
        let remaining: Vec<u32> = table.rows.iter().map(|row| row.remaining).collect();
        assert_eq!(remaining, vec![0, 10, 20, 25]);
    }

    #[test]
    fn first_step_matches_recurrence() {
        let table = TableCommand::build(&args(0.2, 200, 1)).unwrap();
        assert!((table.rows[1].target - 0.36).abs() < 1e-12);
    }

    #[test]
    fn invalid_reservation_is_rejected() {
        assert!(matches!(
            TableCommand::build(&args(1.5, 10, 1)),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_round_count_is_rejected() {
        assert!(matches!(
            TableCommand::build(&args(0.2, u32::MAX, 1000)),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
