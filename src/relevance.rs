//! Composite relevance ranking of recorded knowledge paths.
//!
//! A path is a candidate only if its reported success beats neutral (`> 0.5`). Its
//! score is the sum of four independent signals against the caller's input:
//!
//! | Signal | Contribution | Condition |
//! |--------|--------------|-----------|
//! | exact intent | `1.0` | path intent string == analyzed category name |
//! | text similarity | `0.8 × sim` | normalized edit-distance similarity `> 0.3` |
//! | keyword overlap | `0.6 × ratio` | at least one shared word |
//! | same category | `0.5` | non-general category, path intent re-classifies to it |
//!
//! Candidates scoring `>= 0.3` are returned, best first, with ties kept in their
//! stored order.

use serde::Serialize;
use std::collections::HashSet;

use crate::heat::types::{HeatMap, KnowledgePath};
use crate::intent::{classify, IntentAnalysis, IntentCategory};

const MIN_SUCCESS: f64 = 0.5;
const MIN_SCORE: f64 = 0.3;

const EXACT_INTENT_WEIGHT: f64 = 1.0;
const SIMILARITY_WEIGHT: f64 = 0.8;
const SIMILARITY_FLOOR: f64 = 0.3;
const OVERLAP_WEIGHT: f64 = 0.6;
const CATEGORY_WEIGHT: f64 = 0.5;

/// Why a path earned (part of) its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum ScoreReason {
    ExactIntent,
    TextSimilarity { similarity: f64 },
    KeywordOverlap { ratio: f64 },
    SameCategory { category: IntentCategory },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPath {
    pub path: KnowledgePath,
    pub score: f64,
    pub reasons: Vec<ScoreReason>,
}

/// Rank every recorded path in `map` against the analyzed input.
pub fn rank(analysis: &IntentAnalysis, input: &str, map: &HeatMap) -> Vec<ScoredPath> {
    let mut ranked: Vec<ScoredPath> = map
        .paths
        .iter()
        .filter(|path| path.success > MIN_SUCCESS)
        .filter_map(|path| {
            let (score, reasons) = score_path(analysis, input, path);
            (score >= MIN_SCORE).then(|| ScoredPath {
                path: path.clone(),
                score,
                reasons,
            })
        })
        .collect();

    // `sort_by` is stable: equal scores keep their stored order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Composite score of one path and the signals that contributed to it.
pub fn score_path(
    analysis: &IntentAnalysis,
    input: &str,
    path: &KnowledgePath,
) -> (f64, Vec<ScoreReason>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if path.intent == analysis.intent.as_str() {
        score += EXACT_INTENT_WEIGHT;
        reasons.push(ScoreReason::ExactIntent);
    }

    let sim = similarity(input, &path.intent);
    if sim > SIMILARITY_FLOOR {
        score += SIMILARITY_WEIGHT * sim;
        reasons.push(ScoreReason::TextSimilarity { similarity: sim });
    }

    let ratio = word_overlap(input, &path.intent);
    if ratio > 0.0 {
        score += OVERLAP_WEIGHT * ratio;
        reasons.push(ScoreReason::KeywordOverlap { ratio });
    }

    if analysis.intent != IntentCategory::General && classify(&path.intent) == analysis.intent {
        score += CATEGORY_WEIGHT;
        reasons.push(ScoreReason::SameCategory {
            category: analysis.intent,
        });
    }

    (score, reasons)
}

/// Case-insensitive `(maxLen - editDistance) / maxLen`; `1.0` for two empty strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    (max_len - levenshtein(&a, &b)) as f64 / max_len as f64
}

/// Classic two-row edit distance (insert, delete, substitute all cost 1).
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Shared lowercased words over the size of the larger word set.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let words = |s: &str| -> HashSet<String> {
        s.split_whitespace().map(|w| w.to_lowercase()).collect()
    };
    let a = words(a);
    let b = words(b);
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / larger as f64
}
