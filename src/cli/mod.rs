//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod accounts;
pub mod autogroup;
pub mod group;
pub mod import;
pub mod transactions;

pub use accounts::handle_accounts_command;
pub use autogroup::handle_autogroup_command;
pub use group::{handle_group_command, GroupCommands};
pub use import::handle_import_command;
pub use transactions::handle_transactions_command;
