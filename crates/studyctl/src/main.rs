//! Study Buddy Control - CLI front end for the study assistant
//!
//! Explains topics, summarizes notes, runs quizzes and shows flashcards
//! using an OpenAI-compatible model endpoint, and keeps a local activity log.

mod commands;
mod display;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_common::StudyError;

// Version is embedded at build time
const VERSION: &str = env!("STUDYCTL_VERSION");

const EXIT_SUCCESS: i32 = 0;
const EXIT_GENERAL_ERROR: i32 = 1;

#[derive(Parser)]
#[command(name = "studyctl")]
#[command(about = "Study Buddy - AI study assistant", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/study-buddy/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print raw JSON results instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by STUDY_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain a topic
    Explain {
        topic: String,

        /// easy, medium or hard
        #[arg(long, short, default_value = "medium")]
        difficulty: String,
    },

    /// Summarize notes, a text file or a voice-note transcript
    Summarize {
        /// Text to summarize (omit when using --file)
        text: Option<String>,

        /// Read the content from a file
        #[arg(long, short, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// revision or exam
        #[arg(long, short, default_value = "revision")]
        mode: String,
    },

    /// Generate and take a 5-question quiz
    Quiz { topic: String },

    /// Generate flashcards for a topic
    Flashcards { topic: String },

    /// Show recent activity
    History {
        /// Number of entries to show
        #[arg(long, short, default_value_t = 20)]
        limit: usize,
    },

    /// Show past quiz scores
    Scores,

    /// Show the progress dashboard
    Dashboard,

    /// Delete all history and quiz scores
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the effective configuration
    Config {
        /// Print the config file path only
        #[arg(long)]
        show_path: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!("studyctl v{} starting", VERSION);

    let code = match run(cli).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            display::print_error(&e);
            e.downcast_ref::<StudyError>()
                .map(StudyError::exit_code)
                .unwrap_or(EXIT_GENERAL_ERROR)
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = commands::Context::load(cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Explain { topic, difficulty } => commands::explain(&ctx, &topic, &difficulty).await,
        Commands::Summarize { text, file, mode } => {
            commands::summarize(&ctx, text.as_deref(), file.as_deref(), &mode).await
        }
        Commands::Quiz { topic } => commands::quiz(&ctx, &topic).await,
        Commands::Flashcards { topic } => commands::flashcards(&ctx, &topic).await,
        Commands::History { limit } => commands::history(&ctx, limit),
        Commands::Scores => commands::scores(&ctx),
        Commands::Dashboard => commands::dashboard(&ctx),
        Commands::Clear { yes } => commands::clear(&ctx, yes),
        Commands::Config { show_path } => commands::config(&ctx, show_path),
    }
}
