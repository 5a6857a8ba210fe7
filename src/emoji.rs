//! Emoji extraction and naming.

use regex::Regex;

use crate::error::Result;

/// A keycap, a regional-indicator flag pair, or one pictograph with its
/// optional variation selector and skin-tone modifier, joined into ZWJ sequences
const EMOJI_PATTERN: &str = r"[#*0-9]\x{FE0F}?\x{20E3}|\p{Regional_Indicator}{2}|\p{Extended_Pictographic}\x{FE0F}?\p{Emoji_Modifier}?(?:\x{200D}\p{Extended_Pictographic}\x{FE0F}?\p{Emoji_Modifier}?)*";

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Finds emoji in message text
#[derive(Debug, Clone)]
pub struct EmojiExtractor {
    emoji_regex: Regex,
}

impl EmojiExtractor {
    /// Compile the emoji pattern
    pub fn new() -> Result<Self> {
        Ok(Self {
            emoji_regex: Regex::new(EMOJI_PATTERN)?,
        })
    }

    /// Every emoji in text order
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.emoji_regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// True when the text holds at least one emoji and nothing else but
    /// whitespace and joiners
    #[must_use]
    pub fn is_emoji_only(&self, text: &str) -> bool {
        if !self.emoji_regex.is_match(text) {
            return false;
        }

        self.emoji_regex
            .replace_all(text, "")
            .chars()
            .all(|c| c.is_whitespace() || c == ZERO_WIDTH_JOINER || c == VARIATION_SELECTOR)
    }

    /// Replace each emoji with `:its_name:`
    #[must_use]
    pub fn demojize(&self, text: &str) -> String {
        self.emoji_regex
            .replace_all(text, |captures: &regex::Captures<'_>| {
                let emoji = &captures[0];
                emoji_name(emoji).map_or_else(|| emoji.to_string(), |name| format!(":{name}:"))
            })
            .into_owned()
    }
}

/// Snake-case name of an emoji, if it is a known one
#[must_use]
pub fn emoji_name(emoji: &str) -> Option<String> {
    let found = emojis::get(emoji).or_else(|| emojis::get(&emoji.replace(VARIATION_SELECTOR, "")))?;

    let mut name = String::new();
    for c in found.name().chars() {
        if c.is_alphanumeric() {
            name.extend(c.to_lowercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    Some(name.trim_matches('_').to_string())
}
