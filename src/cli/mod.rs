//! Interactive and scripted command shell over a [`LedgerSession`](crate::core::session::LedgerSession).

pub mod context;
pub mod output;
mod shell;
pub mod table;

pub use context::{CliError, CliMode};
pub use shell::{run_cli, SCRIPT_ENV};
