//! Message-type classification and URL categorization.

use regex::Regex;

use crate::emoji::EmojiExtractor;
use crate::error::Result;
use crate::models::{MediaUrls, MessageType};

/// Lowercase placeholders exports write instead of attachments
pub const MEDIA_OMITTED_MARKERS: [&str; 7] = [
    "<media omitted>",
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "gif omitted",
    "document omitted",
];

/// Classifies message content and sorts the links it contains
#[derive(Debug, Clone)]
pub struct MediaClassifier {
    url_regex: Regex,
    document_regex: Regex,
    image_regex: Regex,
    video_regex: Regex,
    audio_regex: Regex,
    document_url_regex: Regex,
    emoji: EmojiExtractor,
}

impl MediaClassifier {
    /// Compile the URL and attachment patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_regex: Regex::new(r"https?://\S+|www\.\S+")?,
            document_regex: Regex::new(r"(?i)\.(?:pdf|docx?|xlsx?|pptx?|zip|rar)\b")?,
            image_regex: Regex::new(r"(?i)^\S+\.(?:jpg|jpeg|png|gif|webp|bmp)")?,
            video_regex: Regex::new(r"(?i)^\S+\.(?:mp4|avi|mov|mkv|webm)")?,
            audio_regex: Regex::new(r"(?i)^\S+\.(?:mp3|wav|m4a|flac|aac)")?,
            document_url_regex: Regex::new(r"(?i)^\S+\.(?:pdf|docx?|xlsx?|pptx?)")?,
            emoji: EmojiExtractor::new()?,
        })
    }

    /// True when the text is an attachment placeholder
    #[must_use]
    pub fn is_media_placeholder(text: &str) -> bool {
        let lower = text.to_lowercase();
        MEDIA_OMITTED_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// Content shape of a message; the first matching rule wins
    ///
    /// Media placeholders, then links, then emoji-only text, then document
    /// mentions. Anything else is text.
    #[must_use]
    pub fn classify(&self, text: &str) -> MessageType {
        if Self::is_media_placeholder(text) {
            MessageType::Media
        } else if self.url_regex.is_match(text) {
            MessageType::Link
        } else if self.emoji.is_emoji_only(text) {
            MessageType::EmojiOnly
        } else if self.document_regex.is_match(text) {
            MessageType::Document
        } else {
            MessageType::Text
        }
    }

    /// URLs in the text sorted by what they point at, in first-seen order
    #[must_use]
    pub fn extract_urls(&self, text: &str) -> MediaUrls {
        let mut media = MediaUrls::default();
        if Self::is_media_placeholder(text) {
            media.media_omitted = true;
            return media;
        }

        for url in self.url_regex.find_iter(text).map(|m| m.as_str()) {
            let bucket = if self.image_regex.is_match(url) {
                &mut media.images
            } else if self.video_regex.is_match(url) {
                &mut media.videos
            } else if self.audio_regex.is_match(url) {
                &mut media.audio
            } else if self.document_url_regex.is_match(url) {
                &mut media.documents
            } else {
                &mut media.links
            };

            if !bucket.iter().any(|seen| seen == url) {
                bucket.push(url.to_string());
            }
        }

        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> MediaClassifier {
        MediaClassifier::new().expect("Failed to create media classifier")
    }

    #[test]
    fn test_classification_priority() {
        let c = classifier();
        assert_eq!(c.classify("<Media omitted>"), MessageType::Media);
        assert_eq!(c.classify("IMG-001.jpg image omitted"), MessageType::Media);
        assert_eq!(c.classify("see https://example.com/report.pdf"), MessageType::Link);
        assert_eq!(c.classify("😂😂"), MessageType::EmojiOnly);
        assert_eq!(c.classify("sent you notes.docx"), MessageType::Document);
        assert_eq!(c.classify("see you at five"), MessageType::Text);
    }

    #[test]
    fn test_extract_urls_by_kind() {
        let urls = classifier().extract_urls(
            "pics https://x.io/a.JPG and https://x.io/b.mp4 plus https://x.io/c.pdf, www.example.com and https://x.io/a.JPG",
        );
        assert_eq!(urls.images, vec!["https://x.io/a.JPG"]);
        assert_eq!(urls.videos, vec!["https://x.io/b.mp4"]);
        assert_eq!(urls.documents, vec!["https://x.io/c.pdf,"]);
        assert_eq!(urls.links, vec!["www.example.com"]);
        assert!(!urls.media_omitted);
        assert_eq!(urls.url_count(), 4);
    }

    #[test]
    fn test_placeholder_sets_flag() {
        let urls = classifier().extract_urls("<Media omitted>");
        assert!(urls.media_omitted);
        assert_eq!(urls.url_count(), 0);
    }
}
