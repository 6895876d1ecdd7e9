//! Text segmentation utilities for revision analytics
//!
//! Sentence splitting is a punctuation heuristic, not a linguistic boundary
//! detector: a run of `.`/`!`/`?` followed by whitespace or end-of-string ends a
//! sentence, so abbreviations like "Dr. Smith" split. Downstream depth thresholds
//! were calibrated against this exact behavior; keep it as-is.

use std::sync::OnceLock;

use regex::Regex;

static SENTENCE_SPLIT: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
static NON_WORD: OnceLock<Regex> = OnceLock::new();
static WORD_TOKEN: OnceLock<Regex> = OnceLock::new();
static WORD: OnceLock<Regex> = OnceLock::new();
static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

fn sentence_split_re() -> &'static Regex {
    SENTENCE_SPLIT.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"))
}

fn whitespace_run_re() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn non_word_re() -> &'static Regex {
    // Strip punctuation but keep apostrophes (contractions survive normalization)
    NON_WORD.get_or_init(|| Regex::new(r"[^\w\s']").expect("valid regex"))
}

fn word_token_re() -> &'static Regex {
    WORD_TOKEN.get_or_init(|| Regex::new(r"[A-Za-z0-9']+").expect("valid regex"))
}

fn word_re() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(r"\w+").expect("valid regex"))
}

fn paragraph_break_re() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n+").expect("valid regex"))
}

/// Split text into sentences on terminal punctuation runs.
///
/// Empty fragments are discarded after trimming.
pub fn split_sentences(text: &str) -> Vec<String> {
    let t = text.trim();
    if t.is_empty() {
        return Vec::new();
    }
    sentence_split_re()
        .split(t)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a sentence for exact-match comparison:
/// lowercase, collapse internal whitespace, strip punctuation except apostrophes.
pub fn normalize_sentence(sentence: &str) -> String {
    let s = sentence.to_lowercase();
    let s = whitespace_run_re().replace_all(s.trim(), " ");
    let s = non_word_re().replace_all(&s, "");
    s.trim().to_string()
}

/// Tokenize text into lowercase alphanumeric-plus-apostrophe tokens
pub fn tokenize_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_token_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Count words in text using a conservative definition:
/// sequences of word characters.
pub fn word_count(text: &str) -> usize {
    word_re().find_iter(text).count()
}

/// Count non-empty paragraph blocks separated by blank lines
pub fn paragraph_count(text: &str) -> usize {
    let t = text.trim();
    if t.is_empty() {
        return 0;
    }
    paragraph_break_re()
        .split(t)
        .filter(|b| !b.trim().is_empty())
        .count()
}
