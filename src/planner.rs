//! Token-bounded loading plans.
//!
//! Walks ranked paths best-first, accepting each one whose estimated cost still
//! fits the budget, and stops once the accepted total reaches the stop ratio of
//! the budget. Cost is a fixed per-step heuristic; no content is measured.

use serde::Serialize;

use crate::config::RetrievalConfig;
use crate::heat::types::KnowledgePath;
use crate::relevance::{ScoreReason, ScoredPath};

/// One accepted path in a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    /// First resource of the path: where loading starts.
    pub path: String,
    /// Relevance score the path was ranked with.
    pub gradient: f64,
    pub tokens: usize,
    pub path_id: String,
    pub intent: String,
    pub sequence: Vec<String>,
    pub reasons: Vec<ScoreReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadingPlan {
    pub entries: Vec<PlanEntry>,
    pub total_tokens: usize,
}

pub struct LoadingPlanner {
    tokens_per_step: usize,
    stop_ratio: f64,
}

impl LoadingPlanner {
    pub fn new(tokens_per_step: usize, stop_ratio: f64) -> Self {
        Self {
            tokens_per_step,
            stop_ratio,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.tokens_per_step, config.budget_stop_ratio)
    }

    pub fn estimate_tokens(&self, path: &KnowledgePath) -> usize {
        path.sequence.len() * self.tokens_per_step
    }

    /// Greedy prefix selection. The returned total never exceeds `max_tokens`.
    pub fn plan(&self, ranked: &[ScoredPath], max_tokens: usize) -> LoadingPlan {
        let stop_at = self.stop_ratio * max_tokens as f64;
        let mut entries = Vec::new();
        let mut total_tokens = 0usize;

        for candidate in ranked {
            let Some(first) = candidate.path.sequence.first() else {
                // Nothing to load for a session that never visited anything.
                continue;
            };
            let tokens = self.estimate_tokens(&candidate.path);
            if total_tokens + tokens <= max_tokens {
                total_tokens += tokens;
                entries.push(PlanEntry {
                    path: first.clone(),
                    gradient: candidate.score,
                    tokens,
                    path_id: candidate.path.id.clone(),
                    intent: candidate.path.intent.clone(),
                    sequence: candidate.path.sequence.clone(),
                    reasons: candidate.reasons.clone(),
                });
            }
            if total_tokens as f64 >= stop_at {
                break;
            }
        }

        LoadingPlan {
            entries,
            total_tokens,
        }
    }
}
