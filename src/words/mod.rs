use anyhow::{Context, Result};
use rand::Rng;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordListError {
    #[error("no preset word has between 1 and {max_len} letters")]
    NoEligibleWords { max_len: usize },
}

/// Preset words to draw puzzles from, one per line in the source file
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Load a word list from a newline-delimited file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        let list = Self::from_words(content.lines());

        tracing::info!("Loaded {} preset words from {}", list.len(), path.display());

        Ok(list)
    }

    /// Build a list from in-memory words, dropping blank entries
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Create an empty word list (no preset file available)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Draw `count` words at random, repeats allowed, skipping any longer
    /// than `max_len`
    pub fn pick(
        &self,
        count: usize,
        max_len: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<String>, WordListError> {
        let eligible: Vec<&String> = self
            .words
            .iter()
            .filter(|word| word.chars().count() <= max_len)
            .collect();

        if eligible.is_empty() {
            return Err(WordListError::NoEligibleWords { max_len });
        }

        Ok((0..count)
            .map(|_| eligible[rng.random_range(0..eligible.len())].clone())
            .collect())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
