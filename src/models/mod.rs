//! Core data models for moneymanager

pub mod bind;
pub mod group;
pub mod rules;
pub mod transaction;

pub use bind::{BindKind, GroupBind};
pub use group::GroupNode;
pub use rules::{RawRule, Rule, RuleSet, TransactionField};
pub use transaction::Transaction;
