//! CLI command handlers for group management

use clap::Subcommand;

use crate::display::format_group_tree;
use crate::error::MoneyManagerResult;
use crate::storage::Storage;

/// Group management commands
#[derive(Debug, Subcommand)]
pub enum GroupCommands {
    /// Show the group hierarchy with bind counts
    Tree,

    /// Create a new group
    Create {
        /// Name of the new group (must be unique across the hierarchy)
        name: String,
        /// Parent group; omit to create a root group
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename a group, updating every bind that references it
    Rename {
        /// Current name
        name: String,
        /// New name (must be unique across the hierarchy)
        new_name: String,
    },

    /// Delete a group, its subgroups, and every bind referencing them
    Delete {
        /// Name of the group to delete
        name: String,
    },
}

/// Handle a group management command
pub fn handle_group_command(storage: &mut Storage, command: GroupCommands) -> MoneyManagerResult<()> {
    match command {
        GroupCommands::Tree => {
            println!("{}", format_group_tree(&storage.groups, &storage.binds));
        }
        GroupCommands::Create { name, parent } => {
            storage.groups.create(&name, parent.as_deref())?;
            storage.save_groups()?;
            println!("Created group '{name}'.");
        }
        GroupCommands::Rename { name, new_name } => {
            let Storage { groups, binds, .. } = storage;
            groups.rename(&name, &new_name, binds)?;
            storage.save_groups()?;
            storage.save_data()?;
            println!("Renamed group '{name}' to '{new_name}'.");
        }
        GroupCommands::Delete { name } => {
            let binds_before = storage.binds.len();
            let Storage { groups, binds, .. } = storage;
            groups.remove(&name, binds)?;
            storage.save_groups()?;
            storage.save_data()?;
            println!(
                "Deleted group '{name}' and {} associated bind(s).",
                binds_before - storage.binds.len()
            );
        }
    }
    Ok(())
}
