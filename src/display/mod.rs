//! Display formatting for terminal output

pub mod group;
pub mod transaction;

pub use group::format_group_tree;
pub use transaction::{format_amount, transactions_table};
