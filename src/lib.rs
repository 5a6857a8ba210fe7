//! Chat Sentiment - WhatsApp Export Analysis
//!
//! A Rust library for parsing WhatsApp chat exports and annotating every
//! message with ensemble sentiment, emotions, keywords, emoji, media and
//! language, then aggregating the results per export.
//!
//! # Features
//!
//! - Tolerant multi-format timestamp parsing with multi-line messages
//! - Two lexical sentiment scorers combined by a weighted ensemble
//! - Disagreement detection and human-readable explanations
//! - Emotion, keyword, emoji, media and language annotation
//! - Background analysis jobs with bounded concurrency
//! - Export to multiple formats (TXT, CSV, JSON)

/// Run-level aggregation
pub mod aggregate;
/// Configuration management
pub mod config;
/// Emoji extraction
pub mod emoji;
/// Keyword-based emotion detection
pub mod emotion;
/// Weighted combination of two scorers
pub mod ensemble;
/// Error types
pub mod error;
/// Sentiment explanations
pub mod explain;
/// Analysis export
pub mod file_writer;
/// Keyword extraction
pub mod keywords;
/// Language and Hinglish detection
pub mod language;
/// Embedded sentiment lexicons
pub mod lexicon;
/// Logging setup and utilities
pub mod logging;
/// Media classification and URL extraction
pub mod media;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// NLP processing
pub mod nlp;
/// WhatsApp export parsing
pub mod parser;
/// Whole-export analysis
pub mod pipeline;
/// Job status storage
pub mod repository;
/// Sentiment scorers
pub mod scorers;
/// Background analysis jobs
pub mod service;
/// Small shared helpers
pub mod utils;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use error::{ChatSentimentError, Result};
pub use models::{ChatAnalysis, OutputFormat, ParsedMessage, SentimentLabel};
pub use nlp::NlpProcessor;
pub use pipeline::ChatAnalyzer;
pub use service::AnalysisService;
