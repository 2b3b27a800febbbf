//! Quarto CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "quarto")]
#[command(version = quarto_util::cli_version())]
#[command(about = "Quarto editor integration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Quarto language server over stdio
    Lsp,

    /// Decide whether saving a document should trigger a render
    RenderOnSave {
        /// Saved document
        file: PathBuf,

        /// Editor workspace folder (repeatable)
        #[arg(long = "workspace", value_name = "DIR")]
        workspaces: Vec<PathBuf>,

        /// JSON file with editor settings
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Host editor version, used to gate notebook save events
        #[arg(long, value_name = "VER")]
        host_version: Option<String>,

        /// The host exposes notebook save notifications
        #[arg(long)]
        notebook_save_events: bool,
    },

    /// Print the directory a document is previewed from
    PreviewDir {
        /// Document path
        file: PathBuf,

        /// Editor workspace folder (repeatable)
        #[arg(long = "workspace", value_name = "DIR")]
        workspaces: Vec<PathBuf>,
    },

    /// Print a document's YAML front matter as JSON
    FrontMatter {
        /// Document path
        file: PathBuf,

        /// Print whether the document is a Shiny document instead
        #[arg(long)]
        shiny: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging. Stdout carries command output and LSP traffic.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarto=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lsp => commands::lsp::execute(),
        Commands::RenderOnSave {
            file,
            workspaces,
            settings,
            host_version,
            notebook_save_events,
        } => commands::render_on_save::execute(commands::render_on_save::RenderOnSaveArgs {
            file,
            workspaces,
            settings,
            host_version,
            notebook_save_events,
        }),
        Commands::PreviewDir { file, workspaces } => {
            commands::preview_dir::execute(&file, &workspaces)
        }
        Commands::FrontMatter { file, shiny } => commands::front_matter::execute(&file, shiny),
    }
}
