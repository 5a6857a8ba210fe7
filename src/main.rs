use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use chat_sentiment::config::AppConfig;
use chat_sentiment::file_writer::write_analysis_to_timestamped_dir;
use chat_sentiment::logging::{init_logging, OperationTimer};
use chat_sentiment::metrics::MetricsCollector;
use chat_sentiment::models::OutputFormat;
use chat_sentiment::repository::{InMemoryJobStore, JobState};
use chat_sentiment::validation::InputValidator;
use chat_sentiment::{AnalysisService, ChatAnalyzer, NlpProcessor};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides configuration)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file for JSON records (overrides configuration)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a WhatsApp chat export
    Analyze {
        /// Path to the exported chat text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (json, csv or txt)
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Score messages one at a time, without the per-message timeout
        #[arg(long)]
        sequential: bool,

        /// Seconds to wait for the analysis job
        #[arg(long, default_value = "300")]
        timeout_secs: u64,
    },
    /// Explain the sentiment of a single text
    Explain {
        /// Text to explain
        #[arg(short, long)]
        text: String,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging; the guard flushes the file layer on exit
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.get_log_level());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file_path.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(Some(&log_level), log_file.as_deref())?;

    if let Err(e) = MetricsCollector::init() {
        debug!("Metrics recorder not installed: {}", e);
    }

    info!("Starting chat-sentiment");

    match cli.command {
        Commands::Analyze {
            input,
            format,
            output_dir,
            sequential,
            timeout_secs,
        } => {
            analyze_chat(
                config,
                &input,
                format.as_deref(),
                output_dir,
                sequential,
                Duration::from_secs(timeout_secs),
            )
            .await?;
        },
        Commands::Explain { text } => explain_text(&config, &text)?,
        Commands::ShowConfig => show_config(&config)?,
    }

    Ok(())
}

/// Analyze a chat export through a background job and export the result
async fn analyze_chat(
    config: AppConfig, input: &Path, format: Option<&str>, output_dir: Option<PathBuf>, sequential: bool, timeout: Duration,
) -> Result<()> {
    InputValidator::validate_file_path(input)?;

    // Determine output format
    let format_name = format.unwrap_or(&config.export.default_format);
    let output_format: OutputFormat = format_name.parse().unwrap_or_else(|_| {
        warn!("Invalid format: {}. Using json as default.", format_name);
        OutputFormat::Json
    });

    // Use configuration output directory if not provided
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.export.output_directory));

    let content = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Read {} bytes from {}", content.len(), input.display());

    let analyzer = Arc::new(ChatAnalyzer::new(config).context("Failed to build analyzer")?);
    let mut service = AnalysisService::new(analyzer, Arc::new(InMemoryJobStore::new()));
    if sequential {
        service = service.sequential();
    }

    let timer = OperationTimer::new("analyze_job");
    let job_id = service.submit(content).await?;
    info!("Submitted job {}", job_id);

    let analysis = match service.wait_for(job_id, timeout).await? {
        JobState::Completed { result, .. } => result,
        JobState::Failed { error, .. } => bail!("Analysis failed: {error}"),
        JobState::Processing { .. } => bail!("Analysis did not finish"),
    };
    timer.finish();

    info!(
        "Analyzed {} messages, overall {} ({:.3})",
        analysis.total_messages, analysis.overall_sentiment.label, analysis.overall_sentiment.score
    );
    if analysis.diagnostics.failed_lines_count > 0 {
        warn!("{} lines could not be parsed", analysis.diagnostics.failed_lines_count);
    }

    let started = Instant::now();
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let files = write_analysis_to_timestamped_dir(&analysis, output_format, &output_dir, &timestamp)?;
    MetricsCollector::default().record_export_operation(output_format.extension(), started.elapsed());

    for file in &files {
        info!("Wrote {}", file.display());
    }

    Ok(())
}

/// Print the explanation of one text as JSON
fn explain_text(config: &AppConfig, text: &str) -> Result<()> {
    InputValidator::validate_message_text(text, config.nlp.max_text_length)?;

    let processor = NlpProcessor::new(&config.nlp.processing_version, config)?;
    let explanation = processor.explain(text);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &explanation)?;
    writeln!(stdout)?;
    Ok(())
}

/// Print the effective configuration as YAML
fn show_config(config: &AppConfig) -> Result<()> {
    let yaml = config.to_yaml()?;
    std::io::stdout().lock().write_all(yaml.as_bytes())?;
    Ok(())
}
