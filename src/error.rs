//! Error handling for name-forge

use thiserror::Error;

/// Main error type for name-forge
#[derive(Error, Debug, Clone)]
pub enum NameForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Could not load reference corpus{}: {message}", path_suffix(.path))]
    CorpusLoad {
        message: String,
        path: Option<String>,
    },

    #[error("Could not write reference corpus{}: {message}", path_suffix(.path))]
    CorpusWrite {
        message: String,
        path: Option<String>,
    },

    #[error("Word list unavailable{}: {message}", path_suffix(.path))]
    WordList {
        message: String,
        path: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn path_suffix(path: &Option<String>) -> String {
    path.as_ref().map_or(String::new(), |p| format!(" ({})", p))
}

impl NameForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a corpus load error
    pub fn corpus_load(message: impl Into<String>, path: Option<String>) -> Self {
        Self::CorpusLoad {
            message: message.into(),
            path,
        }
    }

    /// Create a corpus write error
    pub fn corpus_write(message: impl Into<String>, path: Option<String>) -> Self {
        Self::CorpusWrite {
            message: message.into(),
            path,
        }
    }

    /// Create a word list error
    pub fn word_list(message: impl Into<String>, path: Option<String>) -> Self {
        Self::WordList {
            message: message.into(),
            path,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller can carry on (e.g. with an empty corpus or a
    /// fallback generator) after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CorpusLoad { .. } | Self::CorpusWrite { .. } | Self::WordList { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or NAME_FORGE_* variables", message)
            }
            Self::CorpusLoad { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" '{}'", p));
                format!("⚠️  Could not read corpus{}: {}\n💡 Continuing without a corpus accepts the first candidate", path_info, message)
            }
            Self::CorpusWrite { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" '{}'", p));
                format!("⚠️  Could not save to corpus{}: {}\n💡 The name was still generated; save it again later", path_info, message)
            }
            Self::WordList { message, .. } => {
                format!("⚠️  Word list problem: {}\n💡 Falling back to syllable names", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Sampling workers run on blocking tasks; a panic surfaces as a join error
impl From<tokio::task::JoinError> for NameForgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Sampling worker failed: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NameForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_errors_mention_path() {
        let err = NameForgeError::corpus_load("column 'Nombre' not found", Some("ema.csv".to_string()));
        let text = err.to_string();
        assert!(text.contains("ema.csv"));
        assert!(text.contains("Nombre"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_internal_not_recoverable() {
        let err = NameForgeError::internal(format!("worker {} panicked", 3));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("worker 3 panicked"));
    }

    #[tokio::test]
    async fn test_join_error_becomes_internal() {
        let join = tokio::task::spawn_blocking(|| -> usize { panic!("worker gave up") }).await;
        let err = NameForgeError::from(join.unwrap_err());
        assert!(matches!(err, NameForgeError::Internal { .. }));
        assert!(err.user_message().contains("bug"));
    }
}
