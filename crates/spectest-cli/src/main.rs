mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::completion::CompletionSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "spectest",
    about = "Spec-driven change management: list project items and manage shell completions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from spectest/ or .git/)
    #[arg(long, global = true, env = "SPECTEST_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items (changes by default)
    List {
        /// List specs instead of changes
        #[arg(long, conflicts_with = "archived")]
        specs: bool,
        /// List archived changes
        #[arg(long)]
        archived: bool,
    },

    /// Manage shell completions for spectest
    Completion {
        #[command(subcommand)]
        subcommand: CompletionSubcommand,
    },

    /// Emit completion candidates for the generated shell scripts
    #[command(name = "__complete", hide = true)]
    Complete {
        /// Candidate category: changes, specs or archived-changes
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,
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

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::List { specs, archived } => cmd::list::run(&root, specs, archived, cli.json),
        Commands::Completion { subcommand } => cmd::completion::run(subcommand, cli.json),
        Commands::Complete { kind } => {
            // Completion widgets read stdout verbatim; failures only set the exit code.
            if !cmd::complete::run(&root, &kind) {
                std::process::exit(1);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
