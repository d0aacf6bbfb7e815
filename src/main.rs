use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use meeting_intel::commands::{meeting, sales};
use meeting_intel::config::load_app_config;
use meeting_intel::AppState;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meeting-intel")]
#[command(version)]
#[command(about = "Meeting and sales-call intelligence backed by Google Gemini")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a meeting transcript with its calendar metadata
    AnalyzeMeeting {
        /// JSON file with `transcript`, `meetingMetadata` and optional `previousMeetingActions`
        #[arg(long)]
        input: PathBuf,
    },
    /// Print the prompt a meeting analysis would send, without calling the model
    Prompt {
        #[arg(long)]
        input: PathBuf,
    },
    /// Analyze a raw sales call transcript
    AnalyzeCall {
        /// Plain-text transcript file
        #[arg(long)]
        transcript: PathBuf,
    },
    /// Derive pipeline insights from a CRM snapshot
    SalesInsights {
        /// JSON file with `deals`, `leads` and `accounts`
        #[arg(long)]
        input: PathBuf,
    },
}

fn app_state() -> anyhow::Result<AppState> {
    let config = load_app_config().context("failed to load configuration")?;
    log::debug!("Loaded configuration: {:?}", config);
    Ok(AppState::from_config(&config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Prompt { input } => meeting::render_prompt_file(&input).await?,
        Commands::AnalyzeMeeting { input } => {
            meeting::analyze_meeting_file(&app_state()?, &input).await?
        }
        Commands::AnalyzeCall { transcript } => {
            sales::analyze_call_file(&app_state()?, &transcript).await?
        }
        Commands::SalesInsights { input } => {
            sales::sales_insights_file(&app_state()?, &input).await?
        }
    };

    println!("{}", output);
    Ok(())
}
