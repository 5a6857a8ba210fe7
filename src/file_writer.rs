//! File writing utilities for analysis export.
//!
//! This module writes a [`ChatAnalysis`] to disk as a plain-text report, a
//! per-message CSV table or the full JSON document.

use crate::error::Result;
use crate::models::{AnalyzedMessage, ChatAnalysis, OutputFormat};
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write an analysis into a timestamp-named directory.
///
/// Creates `output_dir/timestamp/analysis.<ext>`.
///
/// # Arguments
///
/// * `analysis` - Analysis to write
/// * `format` - Output format (TXT, CSV, or JSON)
/// * `output_dir` - Base output directory
/// * `timestamp` - Directory name (e.g., "2025-01-15_14-30-00")
///
/// # Returns
///
/// Paths of the created files
pub fn write_analysis_to_timestamped_dir(
    analysis: &ChatAnalysis,
    format: OutputFormat,
    output_dir: &Path,
    timestamp: &str,
) -> Result<Vec<PathBuf>> {
    let date_dir = output_dir.join(timestamp);
    create_dir_all(&date_dir)?;

    let file_path = date_dir.join(format!("analysis.{}", format.extension()));
    write_analysis_to_file(analysis, format, &file_path)?;

    Ok(vec![file_path])
}

/// Write an analysis to a file in the specified format.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_analysis_to_file(analysis: &ChatAnalysis, format: OutputFormat, file_path: &Path) -> Result<()> {
    match format {
        OutputFormat::Txt => write_txt_file(analysis, file_path),
        OutputFormat::Csv => write_csv_file(&analysis.messages, file_path),
        OutputFormat::Json => write_json_file(analysis, file_path),
    }
}

/// Write a plain-text report.
///
/// A summary block, then `sender, timestamp, message` per message followed by
/// its sentiment, with a blank line between messages.
fn write_txt_file(analysis: &ChatAnalysis, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Processing version: {}", analysis.processing_version)?;
    writeln!(writer, "Messages: {}", analysis.total_messages)?;
    writeln!(
        writer,
        "Overall sentiment: {} ({:.3})",
        analysis.overall_sentiment.label, analysis.overall_sentiment.score
    )?;
    if let Some(language) = &analysis.primary_language {
        writeln!(writer, "Primary language: {language}")?;
    }
    let senders: Vec<String> = analysis
        .most_active_senders
        .iter()
        .map(|s| format!("{} ({})", s.value, s.count))
        .collect();
    writeln!(writer, "Most active: {}", senders.join(", "))?;
    writeln!(
        writer,
        "Scorer disagreements: {} of {} ({:.1}%)",
        analysis.disagreements.count, analysis.disagreements.compared_messages, analysis.disagreements.rate
    )?;
    if !analysis.summary.is_empty() {
        writeln!(writer, "{}", analysis.summary)?;
    }
    writeln!(writer)?;

    for message in &analysis.messages {
        let sentiment = &message.annotation.sentiment.ensemble;
        writeln!(writer, "{}, {}, {}", message.sender, message.timestamp, message.message)?;
        writeln!(
            writer,
            "[{} {} {:.3} confidence {:.2}]",
            message.annotation.message_type, sentiment.label, sentiment.score, sentiment.confidence
        )?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write one CSV row per analyzed message.
fn write_csv_file(messages: &[AnalyzedMessage], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "ID",
        "Sender",
        "Datetime",
        "Message",
        "Type",
        "Sentiment",
        "Score",
        "Confidence",
        "Language",
        "Keywords",
        "Emojis",
    ])?;

    for message in messages {
        let annotation = &message.annotation;
        let ensemble = &annotation.sentiment.ensemble;
        let keywords: Vec<&str> = annotation.keywords.iter().map(|k| k.value.as_str()).collect();

        writer.write_record([
            (message.index + 1).to_string(),
            message.sender.clone(),
            message.timestamp.to_string(),
            message.message.clone(),
            annotation.message_type.to_string(),
            ensemble.label.to_string(),
            format!("{:.4}", ensemble.score),
            format!("{:.4}", ensemble.confidence),
            annotation.language.clone().unwrap_or_default(),
            keywords.join(" "),
            annotation.emojis.concat(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the full analysis as pretty JSON.
fn write_json_file(analysis: &ChatAnalysis, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, analysis)?;
    writer.flush()?;
    Ok(())
}
