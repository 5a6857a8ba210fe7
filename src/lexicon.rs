//! Embedded word lists for the lexical sentiment scorers.
//!
//! The valence lexicon rates words (and common emoji) on a roughly `[-4, 4]`
//! scale; the polarity lexicon rates words on `[-1, 1]`. Both can be replaced
//! wholesale through the scorers' `with_lexicon` constructors.

use std::collections::HashMap;

/// Word to valence mapping for the compound scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ValenceLexicon {
    entries: HashMap<String, f64>,
}

/// Word to polarity mapping for the polarity scorer
#[derive(Debug, Clone, PartialEq)]
pub struct PolarityLexicon {
    entries: HashMap<String, f64>,
}

macro_rules! lexicon_impl {
    ($name:ident) => {
        impl $name {
            /// Build a lexicon from `(word, weight)` pairs; words are lowercased
            pub fn from_pairs<I, S>(pairs: I) -> Self
            where
                I: IntoIterator<Item = (S, f64)>,
                S: AsRef<str>,
            {
                let entries = pairs
                    .into_iter()
                    .map(|(word, weight)| (word.as_ref().to_lowercase(), weight))
                    .collect();
                Self { entries }
            }

            /// Weight of a lowercased token
            #[must_use]
            pub fn get(&self, token: &str) -> Option<f64> {
                self.entries.get(token).copied()
            }

            /// Number of entries
            #[must_use]
            pub fn len(&self) -> usize {
                self.entries.len()
            }

            /// True when the lexicon has no entries
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.entries.is_empty()
            }

            /// Iterate over `(word, weight)` entries
            pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
                self.entries.iter().map(|(word, weight)| (word.as_str(), *weight))
            }
        }
    };
}

lexicon_impl!(ValenceLexicon);
lexicon_impl!(PolarityLexicon);

const VALENCE_ENTRIES: &[(&str, f64)] = &[
    // positive
    ("good", 1.9),
    ("great", 3.1),
    ("awesome", 3.1),
    ("amazing", 2.8),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("like", 1.5),
    ("liked", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("joy", 2.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("cool", 1.3),
    ("beautiful", 2.9),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("excited", 1.4),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("win", 2.8),
    ("won", 2.7),
    ("yes", 1.7),
    ("sure", 1.3),
    ("okay", 0.9),
    ("ok", 1.2),
    ("lol", 1.8),
    ("haha", 2.0),
    ("hahaha", 2.6),
    ("wow", 2.8),
    ("welcome", 2.0),
    ("sweet", 2.0),
    ("proud", 2.1),
    ("hope", 1.9),
    ("pleased", 1.9),
    ("grateful", 2.0),
    ("super", 2.9),
    // negative
    ("bad", -2.5),
    ("terrible", -2.5),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("worse", -2.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("sad", -2.1),
    ("angry", -2.3),
    ("mad", -2.2),
    ("furious", -2.7),
    ("upset", -1.6),
    ("sorry", -0.3),
    ("hurt", -2.4),
    ("cry", -2.1),
    ("crying", -2.1),
    ("depressed", -2.3),
    ("afraid", -2.0),
    ("scared", -1.9),
    ("worried", -1.2),
    ("anxious", -1.0),
    ("nervous", -1.1),
    ("boring", -1.3),
    ("annoying", -1.7),
    ("annoyed", -1.6),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("stupid", -2.4),
    ("ugly", -2.3),
    ("poor", -2.1),
    ("pathetic", -2.2),
    ("disgusting", -2.4),
    ("problem", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("wrong", -2.1),
    ("sick", -1.4),
    ("tired", -1.9),
    ("miss", -0.6),
    ("no", -1.2),
    ("kill", -3.7),
    ("damn", -1.7),
    // emoji
    ("😊", 2.5),
    ("😄", 2.7),
    ("😃", 2.6),
    ("😁", 2.4),
    ("😂", 2.1),
    ("🤣", 2.2),
    ("😍", 3.0),
    ("🥰", 3.0),
    ("❤", 3.0),
    ("👍", 1.9),
    ("🎉", 2.6),
    ("🙏", 1.5),
    ("😎", 1.9),
    ("😢", -2.2),
    ("😭", -2.1),
    ("😔", -1.8),
    ("😞", -2.1),
    ("😠", -2.5),
    ("😡", -2.8),
    ("🤬", -3.0),
    ("😤", -1.8),
    ("😨", -1.9),
    ("😰", -1.8),
    ("😟", -1.6),
    ("👎", -1.9),
    ("💔", -2.5),
];

const POLARITY_ENTRIES: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("awesome", 1.0),
    ("amazing", 0.6),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("wonderful", 1.0),
    ("brilliant", 0.9),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("love", 0.5),
    ("lovely", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("fun", 0.3),
    ("funny", 0.25),
    ("cool", 0.35),
    ("beautiful", 0.85),
    ("delightful", 1.0),
    ("pleased", 0.5),
    ("grateful", 0.6),
    ("excited", 0.375),
    ("successful", 0.75),
    ("sweet", 0.35),
    ("proud", 0.8),
    ("superb", 1.0),
    ("outstanding", 0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("hate", -0.8),
    ("sad", -0.5),
    ("angry", -0.5),
    ("mad", -0.625),
    ("furious", -0.5),
    ("upset", -0.5),
    ("depressed", -0.5),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("worried", -0.4),
    ("anxious", -0.25),
    ("boring", -1.0),
    ("annoying", -0.8),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("stupid", -0.8),
    ("ugly", -0.7),
    ("poor", -0.4),
    ("pathetic", -1.0),
    ("disgusting", -1.0),
    ("useless", -0.5),
    ("wrong", -0.5),
    ("sick", -0.7),
    ("tired", -0.4),
    ("miserable", -1.0),
];

impl Default for ValenceLexicon {
    fn default() -> Self {
        Self::from_pairs(VALENCE_ENTRIES.iter().copied())
    }
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::from_pairs(POLARITY_ENTRIES.iter().copied())
    }
}

/// Booster words and their sign for the compound scorer
pub const BOOSTER_WORDS: &[(&str, f64)] = &[
    ("absolutely", 1.0),
    ("amazingly", 1.0),
    ("completely", 1.0),
    ("deeply", 1.0),
    ("especially", 1.0),
    ("extremely", 1.0),
    ("hugely", 1.0),
    ("incredibly", 1.0),
    ("most", 1.0),
    ("really", 1.0),
    ("so", 1.0),
    ("super", 1.0),
    ("totally", 1.0),
    ("very", 1.0),
    ("barely", -1.0),
    ("hardly", -1.0),
    ("kinda", -1.0),
    ("less", -1.0),
    ("little", -1.0),
    ("marginally", -1.0),
    ("slightly", -1.0),
    ("somewhat", -1.0),
];

/// Negation words shared by both scorers
pub const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "nowhere", "neither", "nor", "cannot",
    "without", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "cant", "wont", "aint",
];

/// Intensifier multipliers for the polarity scorer
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("completely", 1.4),
    ("totally", 1.4),
    ("really", 1.2),
    ("so", 1.2),
    ("quite", 1.1),
    ("rather", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.7),
    ("barely", 0.5),
    ("hardly", 0.5),
];

/// True for negation words and `n't` contractions
#[must_use]
pub fn is_negation(token: &str) -> bool {
    let lower = token.to_lowercase();
    NEGATION_WORDS.contains(&lower.as_str()) || lower.contains("n't")
}
