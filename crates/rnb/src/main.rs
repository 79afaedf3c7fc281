//! rnb CLI - Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::refresh::EngineChoice;

#[derive(Parser)]
#[command(name = "rnb")]
#[command(version)]
#[command(about = "Notebooks that keep R code, prose and results in one file", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new notebook with a sample body
    Create {
        /// Notebook file to write (defaults to notebook.Rnb)
        path: Option<PathBuf>,

        /// Document title (defaults to RNB_TITLE, then "Untitled")
        #[arg(long)]
        title: Option<String>,

        /// Document author (defaults to RNB_AUTHOR)
        #[arg(long)]
        author: Option<String>,

        /// Creation date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Extra frontmatter entry (KEY=VALUE)
        #[arg(short = 'M', long = "meta")]
        meta: Vec<String>,
    },

    /// Check that a notebook is structurally valid
    Lint {
        /// Notebook file
        path: PathBuf,
    },

    /// Re-render every cell and store the results in the notebook
    Refresh {
        /// Notebook file
        path: PathBuf,

        /// Rendering engine
        #[arg(long, value_enum, default_value_t = EngineChoice::Knitr)]
        engine: EngineChoice,

        /// Console width for printed results (defaults to RNB_CONSOLE_WIDTH, then 80)
        #[arg(long)]
        width: Option<u16>,
    },

    /// Write the notebook as markdown
    Export {
        /// Notebook file
        path: PathBuf,

        /// Write output to FILE (defaults to the input with .md or .Rmd)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Export sources as R Markdown chunks instead of rendered output
        #[arg(long)]
        raw: bool,
    },

    /// Convert an R Markdown file into a notebook
    Import {
        /// R Markdown file
        path: PathBuf,

        /// Write the notebook to FILE (defaults to the input with .Rnb)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(log_level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = log_level.unwrap_or("info");
            EnvFilter::try_new(format!("rnb={level},rnb_core={level}"))
                .with_context(|| format!("Invalid log level: {level}"))?
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Create {
            path,
            title,
            author,
            date,
            meta,
        } => commands::create::execute(commands::create::CreateArgs {
            path,
            title,
            author,
            date,
            meta,
        }),
        Commands::Lint { path } => commands::lint::execute(&path),
        Commands::Refresh {
            path,
            engine,
            width,
        } => commands::refresh::execute(commands::refresh::RefreshArgs {
            path,
            engine,
            width,
        }),
        Commands::Export { path, output, raw } => {
            commands::export::execute(&path, output.as_deref(), raw)
        }
        Commands::Import { path, output } => commands::import::execute(&path, output.as_deref()),
    }
}
