//! Dictionary words seeding the lexical generator

use std::path::Path;
use std::sync::Arc;

use crate::error::{NameForgeError, Result};

/// Shortest dictionary word kept
pub const MIN_WORD_LEN: usize = 3;
/// Longest dictionary word kept
pub const MAX_WORD_LEN: usize = 5;

/// Short lowercase ASCII words, deduplicated and sorted. Cloning shares the list.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Arc<[String]>,
}

impl WordList {
    /// Keep only 3–5 letter ASCII words
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| is_usable(w))
            .collect();
        kept.sort();
        kept.dedup();

        if kept.is_empty() {
            return Err(NameForgeError::word_list(
                format!("no {}-{} letter words found", MIN_WORD_LEN, MAX_WORD_LEN),
                None,
            ));
        }

        Ok(Self { words: kept.into() })
    }

    /// Load a newline-separated word file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NameForgeError::word_list(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        let list = Self::from_words(content.lines()).map_err(|e| match e {
            NameForgeError::WordList { message, .. } => {
                NameForgeError::word_list(message, Some(path.to_string_lossy().to_string()))
            }
            other => other,
        })?;

        tracing::info!(path = %path.display(), words = list.len(), "Word list loaded");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

fn is_usable(word: &str) -> bool {
    (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len())
        && word.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_filters_length_and_charset() {
        let list = WordList::from_words(["cat", "Dog", "it", "elephant", "o'er", "lemon", "cat"]).unwrap();
        let words: Vec<&str> = list.iter().collect();
        assert_eq!(words, vec!["cat", "dog", "lemon"]);
    }

    #[test]
    fn test_empty_is_error() {
        let err = WordList::from_words(["a", "encyclopedia"]).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apple\nkiwi\nbanana\nfig").unwrap();
        let list = WordList::load(file.path()).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some("apple"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WordList::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("not/here.txt"));
    }
}
