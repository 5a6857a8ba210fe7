//! Comprehensive unit tests for file_writer.rs module

use std::fs;

use chat_sentiment::config::AppConfig;
use chat_sentiment::file_writer::{write_analysis_to_file, write_analysis_to_timestamped_dir};
use chat_sentiment::models::{ChatAnalysis, OutputFormat};
use chat_sentiment::ChatAnalyzer;
use tempfile::tempdir;

const CHAT: &str = "8/15/24, 10:30 PM - Alice: This is awesome! 😊\n\
                    8/15/24, 10:31 PM - Bob: This is terrible, \"really\"\n\
                    8/15/24, 10:32 PM - Alice: <Media omitted>";

fn analysis() -> ChatAnalysis {
    ChatAnalyzer::new(AppConfig::default())
        .expect("Failed to create analyzer")
        .analyze(CHAT)
        .expect("analysis")
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("csv".parse::<OutputFormat>().expect("csv"), OutputFormat::Csv);
    assert_eq!("JSON".parse::<OutputFormat>().expect("json"), OutputFormat::Json);
    assert_eq!("txt".parse::<OutputFormat>().expect("txt"), OutputFormat::Txt);
    assert!("xml".parse::<OutputFormat>().is_err());
}

#[test]
fn test_write_json_is_full_analysis() {
    let dir = tempdir().expect("Failed to create temp directory");
    let files = write_analysis_to_timestamped_dir(&analysis(), OutputFormat::Json, dir.path(), "2024-08-15_22-30-00")
        .expect("write");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0], dir.path().join("2024-08-15_22-30-00").join("analysis.json"));

    let contents = fs::read_to_string(&files[0]).expect("read");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("parse");
    assert_eq!(json["total_messages"], 3);
    assert_eq!(json["messages"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_write_csv_one_row_per_message() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("out.csv");
    write_analysis_to_file(&analysis(), OutputFormat::Csv, &path).expect("write");

    let mut reader = csv::Reader::from_path(&path).expect("open");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "ID");
    assert_eq!(&headers[5], "Sentiment");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "Alice");
    assert_eq!(&rows[0][5], "Positive");
    assert_eq!(&rows[0][10], "😊");
    assert_eq!(&rows[1][3], "This is terrible, \"really\"");
    assert_eq!(&rows[2][4], "media");
}

#[test]
fn test_write_txt_report() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("out.txt");
    write_analysis_to_file(&analysis(), OutputFormat::Txt, &path).expect("write");

    let contents = fs::read_to_string(&path).expect("read");
    assert!(contents.starts_with("Processing version: 1.0\nMessages: 3\n"));
    assert!(contents.contains("Most active: Alice (2), Bob (1)"));
    assert!(contents.contains("Scorer disagreements: "));
    assert!(contents.contains("Alice, 2024-08-15T22:30:00, This is awesome! 😊"));
    assert!(contents.contains("[text Positive"));
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("missing").join("out.json");
    assert!(write_analysis_to_file(&analysis(), OutputFormat::Json, &path).is_err());
}
