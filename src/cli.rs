use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "camview")]
#[command(about = "Full-screen webcam background refresher", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a headless refresh session driven from stdin
    Run(RunArgs),
    /// Print the settings form schema as JSON
    Settings,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Configuration file (defaults to $CAMVIEW_CONFIG or config/camview.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File the current background image is written to
    #[arg(long)]
    pub output: Option<PathBuf>,
}
