//! treesync CLI - tsync command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use treesync_cli::cmd;
use treesync_cli::cmd::lookup::Target;
use treesync_cli::render::RenderOptions;
use treesync_cli::system_config;

/// treesync - replay test model snapshots into a presentation tree
#[derive(Parser)]
#[command(name = "tsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./treesync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply snapshots in order and print the final tree
    Sync {
        /// Workspace snapshot files (JSON)
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
        /// Print the tree after every pass
        #[arg(long)]
        each: bool,
        /// Show full node ids
        #[arg(long)]
        ids: bool,
    },
    /// Find the node for a test id or file
    Lookup {
        /// Workspace snapshot files (JSON)
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
        /// Logical test id
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        test: Option<String>,
        /// File path
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List test cases, optionally under one node
    Tests {
        /// Workspace snapshot files (JSON)
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
        /// Logical id of the node to list under
        #[arg(long)]
        under: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Print a commented example instead
        #[arg(long)]
        example: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = !cli.no_color;
    if let Commands::Config { example } = cli.command {
        return cmd::config::run(cli.config.as_deref(), example, color);
    }

    let config = system_config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Sync { snapshots, each, ids } => {
            let options = RenderOptions {
                color,
                show_ids: ids,
            };
            cmd::sync::run(config, &snapshots, each, options)
        }
        Commands::Lookup { snapshots, test, file } => {
            let target = match (test, file) {
                (Some(id), _) => Target::Test(id),
                (None, Some(path)) => Target::File(cmd::lookup::absolute(&path)),
                (None, None) => anyhow::bail!("Pass --test or --file"),
            };
            let options = RenderOptions {
                color,
                show_ids: false,
            };
            cmd::lookup::run(config, &snapshots, &target, options)
        }
        Commands::Tests { snapshots, under } => {
            cmd::tests::run(config, &snapshots, under.as_deref(), color)
        }
        Commands::Config { .. } => Ok(()),
    }
}
