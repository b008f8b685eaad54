use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use moneymanager::cli::{
    handle_accounts_command, handle_autogroup_command, handle_group_command,
    handle_import_command, handle_transactions_command, GroupCommands,
};
use moneymanager::config::{AccountsSettings, Paths, Settings};
use moneymanager::error::MoneyManagerError;
use moneymanager::readers::ReaderRegistry;
use moneymanager::services::IngestOptions;
use moneymanager::storage::Storage;

#[derive(Parser)]
#[command(
    name = "moneymanager",
    version,
    about = "Personal finance manager for the terminal",
    long_about = "moneymanager imports transactions from bank export files, \
                  organizes them into a hierarchy of groups, and keeps \
                  automatic group assignments consistent with your rules."
)]
struct Cli {
    /// Base directory (defaults to $MONEYMANAGER_PATH or the current directory)
    #[arg(long, global = true, env = "MONEYMANAGER_PATH")]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the standard files and directories
    Init,

    /// Import a bank export file, or every file of a directory
    Import {
        /// Path to the export file or directory
        file: PathBuf,
        /// Copy the source into the exports directory instead of moving it
        #[arg(long)]
        copy: bool,
        /// Refresh the label of transactions that already exist
        #[arg(long)]
        update_labels: bool,
        /// Reconcile in memory but do not write anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconcile automatic group binds against the rules
    Autogroup {
        /// Report pending changes without applying them
        #[arg(long, conflicts_with = "yes")]
        preview: bool,
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Reconcile in memory but do not write anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// List transactions
    Transactions {
        /// Exclude transactions on or after this date (YYYY-MM-DD)
        #[arg(long)]
        before: Option<NaiveDate>,
        /// Exclude transactions prior to this date (YYYY-MM-DD)
        #[arg(long)]
        after: Option<NaiveDate>,
    },

    /// Show a recap of your accounts state
    Accounts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut paths = Paths::new(cli.path)?;
    let settings = Settings::load(&paths)?;
    paths.apply_settings(&settings);

    if let Commands::Init = cli.command {
        paths.init_files()?;
        println!(
            "All the missing files have been created! Drop a bank export and \
             import it with 'moneymanager import'."
        );
        return Ok(());
    }

    let accounts_settings = AccountsSettings::load(&paths)?;
    let mut storage = Storage::new(paths)?;
    for bind in storage.load_all()? {
        let cause = MoneyManagerError::DanglingReference {
            transaction_id: bind.transaction_id,
            group_name: bind.group_name,
        };
        eprintln!("WARNING: {cause}; the bind was dropped");
    }

    let readers = ReaderRegistry::with_defaults();

    match cli.command {
        Commands::Init => unreachable!("handled before loading"),
        Commands::Import {
            file,
            copy,
            update_labels,
            dry_run,
        } => {
            let options = IngestOptions {
                update_labels,
                copy,
                dry_run,
            };
            handle_import_command(&mut storage, &readers, &file, &options)?;
        }
        Commands::Autogroup {
            preview,
            yes,
            dry_run,
        } => {
            handle_autogroup_command(&mut storage, preview, yes, dry_run)?;
        }
        Commands::Group(command) => {
            handle_group_command(&mut storage, command)?;
        }
        Commands::Transactions { before, after } => {
            handle_transactions_command(&mut storage, before, after)?;
        }
        Commands::Accounts => {
            handle_accounts_command(&storage, &accounts_settings)?;
        }
    }

    Ok(())
}
