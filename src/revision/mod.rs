//! Revision analytics between two submission drafts
//!
//! Compares two plain-text snapshots and reports objective, reproducible change
//! statistics plus a qualitative depth label. The engine has no notion of
//! authorship or originality; it reports observable lexical and structural
//! delta only, and never inspects anything beyond the two strings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::{normalize_sentence, paragraph_count, split_sentences, tokenize_words};

/// Sentence-change percentage at or above this is a substantial revision
pub const SUBSTANTIAL_THRESHOLD_PCT: f64 = 70.0;

/// Sentence-change percentage at or above this (but below substantial) is moderate
pub const MODERATE_THRESHOLD_PCT: f64 = 35.0;

/// Objective change statistics between two drafts
///
/// Derived and immutable; recomputed fresh from the pair of texts each time,
/// never persisted independently of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionMetrics {
    /// Percentage of previous sentences with no exact normalized match in the
    /// current draft, in `[0, 100]`
    pub sentence_change_pct: f64,
    /// Jaccard similarity of the two word sets, in `[0, 100]`
    pub word_overlap_pct: f64,
    pub avg_sentence_length_before: f64,
    pub avg_sentence_length_after: f64,
    pub sentence_length_variance_before: f64,
    pub sentence_length_variance_after: f64,
    pub paragraph_count_before: usize,
    pub paragraph_count_after: usize,
}

/// Qualitative summary of how much of a draft's sentences changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionDepth {
    Light,
    Moderate,
    Substantial,
}

impl std::fmt::Display for RevisionDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RevisionDepth::Light => "light",
            RevisionDepth::Moderate => "moderate",
            RevisionDepth::Substantial => "substantial",
        };
        f.write_str(s)
    }
}

/// Compute revision metrics between a previous and a current draft
#[tracing::instrument(skip_all)]
pub fn compute(previous_text: &str, current_text: &str) -> RevisionMetrics {
    let prev_sents = split_sentences(previous_text);
    let curr_sents = split_sentences(current_text);

    let sentence_change_pct = sentence_change_pct(&prev_sents, &curr_sents);
    let word_overlap_pct = word_jaccard_pct(previous_text, current_text);

    let prev_lens: Vec<usize> = prev_sents.iter().map(|s| tokenize_words(s).len()).collect();
    let curr_lens: Vec<usize> = curr_sents.iter().map(|s| tokenize_words(s).len()).collect();

    let metrics = RevisionMetrics {
        sentence_change_pct,
        word_overlap_pct,
        avg_sentence_length_before: mean(&prev_lens),
        avg_sentence_length_after: mean(&curr_lens),
        sentence_length_variance_before: population_variance(&prev_lens),
        sentence_length_variance_after: population_variance(&curr_lens),
        paragraph_count_before: paragraph_count(previous_text),
        paragraph_count_after: paragraph_count(current_text),
    };

    debug!(
        sentence_change_pct = metrics.sentence_change_pct,
        word_overlap_pct = metrics.word_overlap_pct,
        "revision metrics computed"
    );

    metrics
}

/// Map metrics to the default depth label.
///
/// Thresholds are fixed policy constants; a caller wanting different cutoffs
/// re-derives from the raw `sentence_change_pct` instead of overriding these.
pub fn depth_label(metrics: &RevisionMetrics) -> RevisionDepth {
    let pct = metrics.sentence_change_pct;
    if pct >= SUBSTANTIAL_THRESHOLD_PCT {
        RevisionDepth::Substantial
    } else if pct >= MODERATE_THRESHOLD_PCT {
        RevisionDepth::Moderate
    } else {
        RevisionDepth::Light
    }
}

/// A previous sentence counts as unchanged when its normalized form appears
/// verbatim among the normalized current sentences
fn sentence_change_pct(prev_sents: &[String], curr_sents: &[String]) -> f64 {
    // Every split sentence counts, even ones that normalize to empty
    // (symbol-only separators); the denominator is the full previous list
    let prev_norm: Vec<String> = prev_sents.iter().map(|s| normalize_sentence(s)).collect();
    if prev_norm.is_empty() {
        return 0.0;
    }

    let curr_set: HashSet<String> = curr_sents.iter().map(|s| normalize_sentence(s)).collect();

    let unchanged = prev_norm.iter().filter(|s| curr_set.contains(*s)).count();
    let changed = prev_norm.len() - unchanged;
    100.0 * changed as f64 / prev_norm.len() as f64
}

fn word_jaccard_pct(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = tokenize_words(a).into_iter().collect();
    let set_b: HashSet<String> = tokenize_words(b).into_iter().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 100.0;
    }
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    100.0 * intersection as f64 / union as f64
}

fn mean(samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<usize>() as f64 / samples.len() as f64
}

/// Population variance (`Σ(x − mean)² / n`); zero for an empty sample
fn population_variance(samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    samples
        .iter()
        .map(|&x| {
            let d = x as f64 - m;
            d * d
        })
        .sum::<f64>()
        / samples.len() as f64
}
