//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`run`] - Local negotiation session
//! - [`table`] - Expected-utility targets

pub mod run;
pub mod table;

pub use run::RunCommand;
pub use table::TableCommand;
