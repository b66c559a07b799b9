use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    amend_command, graph_command, list_command, preview_command, selected_command,
};

#[derive(Parser, Debug)]
#[command(name = "pantsbridge")]
#[command(version, about = "Validate, preview and import Pants targets", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging\n    PANTS_ROOT=<dir>  Use <dir> as the Pants build root")]
pub struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the targets declared in a directory and below it
    #[command(visible_alias = "ls")]
    List {
        /// Directory relative to the build root
        #[arg(default_value = "")]
        dir: String,
    },
    /// Show what target specs expand to
    #[command(visible_alias = "p")]
    Preview {
        /// Target specs (`dir:name`, `dir:`, `dir::` or `dir`)
        #[arg(required = true)]
        specs: Vec<String>,

        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add target specs to the imported BSP project
    Amend {
        /// Target specs to import
        #[arg(required = true)]
        specs: Vec<String>,

        /// Import only these specs instead of adding to the current selection
        #[arg(long)]
        replace: bool,

        /// Print the fastpass command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Summarize the dependency graph of a `pants export` file
    Graph {
        /// Path to the export JSON
        export: PathBuf,

        /// Also list the targets within this many hops of the roots
        #[arg(short, long)]
        level: Option<usize>,
    },
    /// Show the targets the BSP project was imported with
    Selected {
        /// Give up after this many milliseconds
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
    },
}

impl Cli {
    /// Execute the command
    pub async fn execute(self) -> Result<()> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };

        match self.command {
            Commands::List { dir } => list_command(&cwd, &dir).await,
            Commands::Preview { specs, json } => preview_command(&cwd, &specs, json).await,
            Commands::Amend {
                specs,
                replace,
                dry_run,
            } => amend_command(&cwd, &specs, replace, dry_run).await,
            Commands::Graph { export, level } => graph_command(&cwd.join(export), level),
            Commands::Selected { timeout_ms } => selected_command(&cwd, timeout_ms).await,
        }
    }
}
