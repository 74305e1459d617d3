mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, jql::JqlSubcommand, journal::JournalSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "guardrails",
    about = "Developer guardrails: JQL report queries, AI dev journal, and bundle packaging",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect via git from the current directory)
    #[arg(long, global = true, env = "GUARDRAILS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build sanitized JQL filter strings for status reports
    Jql {
        #[command(subcommand)]
        subcommand: JqlSubcommand,
    },

    /// Record AI-assisted development sessions under docs/
    Journal {
        #[command(subcommand)]
        subcommand: JournalSubcommand,
    },

    /// Zip configured directories into distributable bundles
    Package {
        /// Output directory, relative to the repo root (default: package.out_dir)
        #[arg(long)]
        out: Option<String>,

        /// Directory bundle sources are resolved against (default: repo root)
        #[arg(long)]
        skill_root: Option<PathBuf>,
    },

    /// Inspect and validate .guardrails/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Jql { subcommand } => cmd::jql::run(subcommand, cli.json),
        Commands::Journal { subcommand } => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::journal::run(&root, subcommand, cli.json)
        }
        Commands::Package { out, skill_root } => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::package::run(&root, out.as_deref(), skill_root.as_deref(), cli.json)
        }
        Commands::Config { subcommand } => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::config::run(&root, subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
