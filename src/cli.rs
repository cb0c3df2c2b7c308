use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "offerbook",
    version,
    about = "CSV-backed listing ledger and settings tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    New(NewArgs),
    Add(AddArgs),
    List(ListArgs),
    Snapshot(SnapshotArgs),
    Config(ConfigArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub ledger_path: Option<PathBuf>,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "")]
    pub image: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub quantity: u64,

    #[arg(long, default_value = "0.00")]
    pub price: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub ledger_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub ledger_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    Show,
    Set(ConfigSetArgs),
    Reset,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    #[arg(long)]
    pub ledger_path: Option<PathBuf>,

    #[arg(long)]
    pub log_directory: Option<PathBuf>,

    #[arg(long)]
    pub image_directory: Option<PathBuf>,

    #[arg(long)]
    pub browser_profile: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub clear_browser_profile: bool,

    #[arg(long)]
    pub default_description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,
}
