use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wb",
    about = "Diff, patch and record changes of Wikibase entities",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Repository settings (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the diff between two entity JSON files
    Diff(DiffArgs),
    /// Apply a JSON-Patch document to an entity
    Patch(PatchArgs),
    /// Apply a diff (in change wire format) to an entity
    ApplyDiff(ApplyDiffArgs),
    /// Build the change record for an edit
    Change(ChangeArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Entity before the edit
    pub old: PathBuf,
    /// Entity after the edit
    pub new: PathBuf,
}

#[derive(Args)]
pub struct PatchArgs {
    pub entity: PathBuf,
    /// JSON-Patch document (an array of operations)
    pub patch: PathBuf,
}

#[derive(Args)]
pub struct ApplyDiffArgs {
    pub entity: PathBuf,
    pub diff: PathBuf,
    /// Overwrite conflicting values instead of failing
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ChangeArgs {
    /// Entity before the edit (omit for a creation)
    #[arg(long)]
    pub old: Option<PathBuf>,
    /// Entity after the edit (omit for a deletion)
    #[arg(long)]
    pub new: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    pub revision: u64,
    #[arg(long, default_value_t = 0)]
    pub user_id: u64,
    #[arg(long, default_value = "")]
    pub user_name: String,
    #[arg(long, default_value = "")]
    pub comment: String,
    #[arg(long)]
    pub bot: bool,
}
