//! Banned-term set consulted by the profanity checker.
//!
//! # Purpose
//! Owns the only mutable state the gate shares across requests. Words can be
//! appended at startup or at runtime; every check sees the current set.
//!
//! # Key invariants
//! - Words are stored lowercase and trimmed; empty entries are ignored.
//! - Matching is whole-word and case-insensitive. Text is split on every
//!   character that is not alphanumeric, `$` or `@`.
//! - There is no removal path.
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

const DEFAULT_WORDS: &str = include_str!("../data/banned_words.txt");

#[derive(Debug, Default)]
pub struct Lexicon {
    words: RwLock<HashSet<String>>,
}

impl Lexicon {
    /// Empty lexicon; nothing is considered profane until words are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon seeded with the built-in English word list.
    pub fn with_default_words() -> Self {
        let lexicon = Self::new();
        lexicon.add_all(
            DEFAULT_WORDS
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        );
        lexicon
    }

    /// Returns true when the word was not already present.
    pub fn add(&self, word: &str) -> bool {
        let Some(word) = normalize(word) else {
            return false;
        };
        let mut words = self.words.write().unwrap_or_else(PoisonError::into_inner);
        words.insert(word)
    }

    /// Adds every word under a single write lock and returns how many were new.
    pub fn add_all<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.words.write().unwrap_or_else(PoisonError::into_inner);
        words
            .into_iter()
            .filter_map(|word| normalize(word.as_ref()))
            .map(|word| guard.insert(word))
            .filter(|inserted| *inserted)
            .count()
    }

    pub fn len(&self) -> usize {
        self.words
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_banned(&self, text: &str) -> bool {
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        if words.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        lowered
            .split(|c: char| !is_word_char(c))
            .filter(|token| !token.is_empty())
            .any(|token| words.contains(token))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '$' || c == '@'
}

fn normalize(word: &str) -> Option<String> {
    let word = word.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}
