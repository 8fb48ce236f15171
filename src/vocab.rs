//! Vocabulary list loading and validation
//!
//! The word list arrives as JSON (`[{"word": .., "meaning": ..}]`) from the host
//! page. Entries are trimmed and multi-line meanings are folded onto one line;
//! entries with an empty side are dropped. Duplicates are kept.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_VOCAB_ENTRIES;

/// Errors raised while loading a vocabulary or starting a round with it
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    #[error("need at least {required} vocabulary entries, found {found}")]
    InsufficientVocabulary { found: usize, required: usize },

    #[error("vocabulary contains no usable entries")]
    Empty,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A single word/meaning pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub meaning: String,
}

impl VocabEntry {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
        }
    }

    /// Trim both sides and fold line breaks in the meaning into spaces.
    /// Returns None if either side ends up empty.
    pub fn normalized(&self) -> Option<Self> {
        let word = self.word.trim();
        let meaning = self
            .meaning
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if word.is_empty() || meaning.is_empty() {
            return None;
        }
        Some(Self::new(word, meaning))
    }
}

/// Parse and normalize a JSON vocabulary list
pub fn parse_json(json: &str) -> Result<Vec<VocabEntry>, VocabError> {
    let raw: Vec<VocabEntry> = serde_json::from_str(json)?;
    let total = raw.len();
    let entries: Vec<VocabEntry> = raw.iter().filter_map(VocabEntry::normalized).collect();

    if entries.is_empty() {
        return Err(VocabError::Empty);
    }
    if entries.len() < total {
        log::warn!("Dropped {} blank vocabulary entries", total - entries.len());
    }
    log::info!("Loaded {} vocabulary entries", entries.len());
    Ok(entries)
}

/// Check that a list is large enough to play a round
pub fn ensure_playable(entries: &[VocabEntry]) -> Result<(), VocabError> {
    if entries.len() < MIN_VOCAB_ENTRIES {
        return Err(VocabError::InsufficientVocabulary {
            found: entries.len(),
            required: MIN_VOCAB_ENTRIES,
        });
    }
    Ok(())
}

/// Small built-in list for the demo binary
pub fn demo_vocabulary() -> Vec<VocabEntry> {
    [
        ("cat", "猫"),
        ("dog", "狗"),
        ("bird", "鸟"),
        ("fish", "鱼"),
        ("apple", "苹果"),
        ("river", "河流"),
        ("mountain", "山"),
        ("library", "图书馆"),
    ]
    .into_iter()
    .map(|(w, m)| VocabEntry::new(w, m))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_normalizes() {
        let json = r#"[
            {"word": "  cat ", "meaning": "猫\n(animal)"},
            {"word": "dog", "meaning": "  "},
            {"word": "bird", "meaning": "鸟"}
        ]"#;
        let entries = parse_json(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], VocabEntry::new("cat", "猫 (animal)"));
        assert_eq!(entries[1].word, "bird");
    }

    #[test]
    fn test_parse_json_keeps_duplicates() {
        let json = r#"[{"word": "big", "meaning": "大"}, {"word": "large", "meaning": "大"}]"#;
        assert_eq!(parse_json(json).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_json_errors() {
        assert!(matches!(parse_json("not json"), Err(VocabError::Json(_))));
        assert!(matches!(
            parse_json(r#"[{"word": "", "meaning": "x"}]"#),
            Err(VocabError::Empty)
        ));
    }

    #[test]
    fn test_ensure_playable() {
        let mut list = demo_vocabulary();
        list.truncate(3);
        let err = ensure_playable(&list).unwrap_err();
        assert!(matches!(
            err,
            VocabError::InsufficientVocabulary {
                found: 3,
                required: 4
            }
        ));
        list.push(VocabEntry::new("fish", "鱼"));
        assert!(ensure_playable(&list).is_ok());
    }
}
