//! Command-line front end for PancreScan

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use pancrescan::io::upload::UploadedFile;
use pancrescan::presentation::chart::render_text;
use pancrescan::presentation::heatmap::OverlayConfig;
use pancrescan::presentation::report::render_text_report;
use pancrescan::presentation::{chatbot, ResultsSession};
use pancrescan::{AnalysisConfig, AnalysisService};

/// Offline pancreatic scan demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a scan and print the results
    Analyze(AnalyzeArgs),
    /// Ask the assistant questions, optionally about a scan
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// JPEG, PNG or DICOM file
    file: PathBuf,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the scan view with heatmap overlay to this PNG
    #[arg(long, value_name = "OUT.png")]
    heatmap: Option<PathBuf>,

    /// Write the PDF report to this path
    #[arg(long, value_name = "OUT.pdf")]
    report: Option<PathBuf>,

    /// Simulate analysis latency
    #[arg(long)]
    delay: bool,

    /// JSON configuration file
    #[arg(long, value_name = "CFG.json")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ChatArgs {
    /// Scan to analyse first, so results questions can be answered
    #[arg(long)]
    file: Option<PathBuf>,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Message to send; reads lines from stdin when omitted
    #[arg(long = "message", short = 'm')]
    messages: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Chat(args) => run_chat(args).await,
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>, delay: bool) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    if !delay {
        config.min_delay_ms = 0;
        config.max_delay_ms = 0;
    }
    Ok(config)
}

async fn open_session(file: &Path, config: AnalysisConfig) -> Result<ResultsSession> {
    let upload = UploadedFile::from_path(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let mut service = AnalysisService::new(config)?;
    let analysis = service
        .analyze_upload(&upload)
        .await
        .with_context(|| format!("analysing {}", file.display()))?;
    Ok(ResultsSession::new(analysis.result, analysis.image_data_url))
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.seed, args.delay)?;
    if args.delay {
        println!("Analyzing image...");
    }
    let mut session = open_session(&args.file, config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.result())?);
    } else {
        let result = session.result();
        println!("{}", render_text(&session.chart(), 40));
        for warning in &result.metadata.warnings {
            println!("warning: {}", warning);
        }
        print!("{}", render_text_report(result, session.image_data_url()));
    }

    if let Some(path) = &args.heatmap {
        // The results view opens with the overlay hidden; asking for a heatmap file turns it on
        if !session.show_heatmap() {
            session.toggle_heatmap();
        }
        match session.heatmap_png(OverlayConfig::default())? {
            Some(png) => {
                std::fs::write(path, png)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("Heatmap written to {}", path.display());
            }
            None => log::warn!("No preview available for this scan; heatmap skipped"),
        }
    }

    if let Some(path) = &args.report {
        session
            .download_report(path)
            .context("Failed to generate report. Please try again.")?;
    }
    Ok(())
}

async fn run_chat(args: ChatArgs) -> Result<()> {
    let config = load_config(None, args.seed, false)?;
    let mut session = match &args.file {
        Some(file) => Some(open_session(file, config).await?),
        None => None,
    };

    println!("bot> {}", chatbot::WELCOME);

    if args.messages.is_empty() {
        for line in std::io::stdin().lock().lines() {
            print_reply(session.as_mut(), &line?);
        }
    } else {
        for message in &args.messages {
            print_reply(session.as_mut(), message);
        }
    }
    Ok(())
}

fn print_reply(session: Option<&mut ResultsSession>, message: &str) {
    let reply = match session {
        Some(session) => session.send_message(message).map(|m| m.text.clone()),
        None if message.trim().is_empty() => None,
        None => Some(chatbot::respond(message, None).unwrap_or_else(|e| {
            log::error!("Chat reply failed: {}", e);
            chatbot::APOLOGY.to_string()
        })),
    };
    if let Some(reply) = reply {
        println!("bot> {}", reply);
    }
}
