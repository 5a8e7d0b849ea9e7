//! timestable CLI: learn, quiz and review the multiplication table in a terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use timestable_core::model::Difficulty;

mod commands;
mod context;
mod i18n;
mod input;
mod reporter;

#[derive(Parser)]
#[command(name = "timestable", version, about = "Multiplication table tutor")]
struct Cli {
    /// Directory holding progress and settings
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the 9x9 table and hear its rhymes
    Learn {
        /// Show a single cell, e.g. "7x8"
        #[arg(long)]
        cell: Option<String>,

        /// Do not speak formulas
        #[arg(long)]
        no_speech: bool,
    },

    /// Timed quiz toward today's target
    Quiz {
        /// beginner, advanced or expert
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Practice the questions answered wrong before
    Review {
        /// Bounds the answer options
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Continue a paused or interrupted quiz
    Resume,

    /// Show progress statistics
    Stats {
        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List achievements
    Achievements,

    /// Write an HTML progress report
    Report {
        /// Output file
        #[arg(long, default_value = "timestable-report.html")]
        output: PathBuf,
    },

    /// Show or set the interface language
    Locale {
        /// zh, en, de or ja
        tag: Option<String>,
    },

    /// Delete all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Create a starter timestable.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("timestable=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let global = context::GlobalArgs {
        data_dir: cli.data_dir,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Learn { cell, no_speech } => commands::learn::execute(&global, cell, no_speech).await,
        Commands::Quiz { difficulty } => commands::quiz::execute(&global, difficulty).await,
        Commands::Review { difficulty } => commands::review::execute(&global, difficulty).await,
        Commands::Resume => commands::resume::execute(&global).await,
        Commands::Stats { format } => commands::stats::execute(&global, format),
        Commands::Achievements => commands::achievements::execute(&global),
        Commands::Report { output } => commands::report::execute(&global, output),
        Commands::Locale { tag } => commands::locale::execute(&global, tag),
        Commands::Reset { yes } => commands::reset::execute(&global, yes),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
