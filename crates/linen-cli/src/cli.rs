use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "linen",
    about = "Linen ledger: track deliveries and dirty collections per linen type",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger document (overrides `data_path` from the config file)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the daily summary table
    Summary,
    /// List linen types with their balances
    Linens,
    /// Add a linen type
    AddLinen(AddLinenArgs),
    /// Record a delivery of clean linen (+)
    Deliver(MovementArgs),
    /// Record a dirty collection (-)
    Collect(MovementArgs),
    /// Change the amount or movement of an entry
    Edit(EditArgs),
    /// Delete an entry
    Delete(DeleteArgs),
    /// Remove a linen type and its history
    RemoveLinen(RemoveLinenArgs),
    /// Clear today's movements, keeping the linen types
    ResetDay,
    /// Show entries, most recent first
    Log(LogArgs),
    /// Check the stored document for inconsistencies
    Verify,
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct AddLinenArgs {
    pub name: String,
}

#[derive(Args)]
pub struct MovementArgs {
    /// Linen index (from `linens`) or name
    pub linen: String,
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry id or a unique prefix of it
    pub id: String,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    /// add, remove, delivery or collection
    #[arg(long)]
    pub movement: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Entry id or a unique prefix of it
    pub id: String,
}

#[derive(Args)]
pub struct RemoveLinenArgs {
    /// Linen index or name
    pub linen: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Rows to show (defaults to `history_limit`)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
