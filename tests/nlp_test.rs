//! Comprehensive unit tests for nlp.rs and the per-message annotators

use chat_sentiment::config::AppConfig;
use chat_sentiment::emoji::{emoji_name, EmojiExtractor};
use chat_sentiment::emotion::EmotionDetector;
use chat_sentiment::error::ChatSentimentError;
use chat_sentiment::keywords::KeywordExtractor;
use chat_sentiment::language::LanguageDetector;
use chat_sentiment::media::MediaClassifier;
use chat_sentiment::models::{MessageType, SentimentLabel};
use chat_sentiment::NlpProcessor;

fn processor() -> NlpProcessor {
    NlpProcessor::new("1.0", &AppConfig::default()).expect("Failed to create processor")
}

#[test]
fn test_processor_rejects_bad_version() {
    let err = NlpProcessor::new("bad version!", &AppConfig::default())
        .err()
        .expect("should fail");
    assert!(matches!(err, ChatSentimentError::InvalidConfig(_)));
}

#[test]
fn test_process_text_positive_message() {
    let annotation = processor().process_text("This is awesome! I am so happy 😊");

    assert_eq!(annotation.message_type, MessageType::Text);
    assert_eq!(annotation.sentiment.ensemble.label, SentimentLabel::Positive);
    assert_eq!(annotation.emojis, vec!["😊".to_string()]);
    assert!(annotation.emotions["joy"] > 99.0);
    assert!(annotation.keywords.iter().any(|k| k.value == "awesome"));
}

#[test]
fn test_media_placeholder_is_neutral() {
    let annotation = processor().process_text("<Media omitted>");

    assert_eq!(annotation.message_type, MessageType::Media);
    assert_eq!(annotation.sentiment.ensemble.label, SentimentLabel::Neutral);
    assert!(annotation.media.media_omitted);
    assert!(annotation.emotions.values().all(|v| *v == 0.0));
}

#[test]
fn test_classification_priority() {
    let media = MediaClassifier::new().expect("classifier");

    assert_eq!(media.classify("image omitted"), MessageType::Media);
    assert_eq!(media.classify("look https://example.com/cat.jpg 😂"), MessageType::Link);
    assert_eq!(media.classify("😂😂 🎉"), MessageType::EmojiOnly);
    assert_eq!(media.classify("1\u{FE0F}\u{20E3}"), MessageType::EmojiOnly);
    assert_eq!(media.classify("sent you report.pdf"), MessageType::Document);
    assert_eq!(media.classify("plain words"), MessageType::Text);
}

#[test]
fn test_url_buckets() {
    let media = MediaClassifier::new().expect("classifier");
    let urls = media.extract_urls(
        "https://a.io/x.png https://a.io/y.mp4 https://a.io/z.mp3 https://a.io/doc.pdf https://a.io https://a.io",
    );

    assert_eq!(urls.images, vec!["https://a.io/x.png".to_string()]);
    assert_eq!(urls.videos.len(), 1);
    assert_eq!(urls.audio.len(), 1);
    assert_eq!(urls.documents.len(), 1);
    assert_eq!(urls.links, vec!["https://a.io".to_string()]);
    assert_eq!(urls.url_count(), 5);
}

#[test]
fn test_emoji_sequences_stay_whole() {
    let emoji = EmojiExtractor::new().expect("extractor");

    assert_eq!(emoji.extract("hi 👍🏽 there"), vec!["👍🏽".to_string()]);
    assert_eq!(emoji.extract("🇮🇳"), vec!["🇮🇳".to_string()]);
    assert_eq!(emoji.extract("👨\u{200d}👩\u{200d}👧").len(), 1);
    assert!(emoji.is_emoji_only(" ❤️ "));
    assert!(!emoji.is_emoji_only("love ❤️"));
}

#[test]
fn test_emoji_names() {
    assert_eq!(emoji_name("😂").as_deref(), Some("face_with_tears_of_joy"));
    assert_eq!(emoji_name("x"), None);

    let emoji = EmojiExtractor::new().expect("extractor");
    assert_eq!(emoji.demojize("ok 😂"), "ok :face_with_tears_of_joy:");
}

#[test]
fn test_keywords_filter_and_rank() {
    let keywords = KeywordExtractor::new(&AppConfig::default().keywords).expect("extractor");
    let top = keywords.extract("pizza tonight? pizza is great, tonight works, see https://menu.example.com");

    let values: Vec<&str> = top.iter().map(|k| k.value.as_str()).collect();
    assert_eq!(values, vec!["pizza", "tonight", "great"]);
    assert_eq!(top[0].count, 2);
    assert!(keywords.extract("   ").is_empty());
}

#[test]
fn test_keyword_ties_keep_first_seen_order() {
    let keywords = KeywordExtractor::new(&AppConfig::default().keywords).expect("extractor");
    let values: Vec<String> = keywords
        .extract_top("zebra apple mango", 3)
        .into_iter()
        .map(|k| k.value)
        .collect();
    assert_eq!(values, vec!["zebra", "apple", "mango"]);
}

#[test]
fn test_emotion_percentages() {
    let detector = EmotionDetector::new(&AppConfig::default().emotions);

    let mixed = detector.detect("so happy but also scared");
    assert!((mixed["joy"] - 50.0).abs() < 1e-9);
    assert!((mixed["fear"] - 50.0).abs() < 1e-9);
    assert!((mixed.values().sum::<f64>() - 100.0).abs() < 1e-9);

    let none = detector.detect("the bus leaves at nine");
    assert_eq!(none.len(), 5);
    assert!(none.values().all(|v| *v == 0.0));
}

#[test]
fn test_language_and_hinglish() {
    let detector = LanguageDetector::new(&AppConfig::default().nlp).expect("detector");

    assert_eq!(
        detector.detect("This is a perfectly ordinary English sentence about the weather today").as_deref(),
        Some("eng")
    );
    assert_eq!(detector.detect("   "), None);
    assert!(detector.is_hinglish("acha bhai see you tomorrow"));
    assert!(!detector.is_hinglish("acha acha see you tomorrow"));
    assert!(!detector.is_hinglish("about the bus"));
}

#[test]
fn test_language_detection_can_be_disabled() {
    let mut config = AppConfig::default();
    config.nlp.enable_language_detection = false;
    let processor = NlpProcessor::new("1.0", &config).expect("processor");

    assert_eq!(
        processor
            .process_text("This is a perfectly ordinary English sentence")
            .language,
        None
    );
}
