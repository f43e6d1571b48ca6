//! Assembly of a complete headline analysis from the JSON returned by an
//! external reasoning step.
//!
//! The reasoning step supplies relevance, per-criterion verdicts, a rewritten
//! headline and a change list. The score it may report is ignored and always
//! recomputed with [`score`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::scorer::{score, CriterionResult, ScoreError};
use crate::wire::null_as_default;

const MISSING_REWRITE: &str = "Could not generate improved headline.";
const FAILED_REWRITE: &str = "Error during analysis. Please try again.";
const STOPPED: &str = "Evaluation stopped due to error.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("malformed analysis JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionChange {
    pub criterion_id: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

/// Shape of the reasoning step's reply: `{ "analysis": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    pub analysis: RawAnalysisBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_relevant: bool,
    #[serde(default)]
    pub original_headline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub criteria_results: Vec<CriterionResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improved_headline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub changes: Vec<CriterionChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineAnalysis {
    pub is_relevant: bool,
    pub original_headline: String,
    pub score: u8,
    pub criteria_results: Vec<CriterionResult>,
    pub improved_headline: String,
    pub changes: Vec<CriterionChange>,
}

impl HeadlineAnalysis {
    pub fn from_results(
        headline: &str,
        is_relevant: bool,
        criteria_results: Vec<CriterionResult>,
        improved_headline: String,
        changes: Vec<CriterionChange>,
    ) -> Result<Self, ScoreError> {
        let score = score(&criteria_results)?;
        let improved_headline = if improved_headline.is_empty() && is_relevant {
            MISSING_REWRITE.to_string()
        } else {
            improved_headline
        };
        Ok(Self {
            is_relevant,
            original_headline: headline.to_string(),
            score,
            criteria_results,
            improved_headline,
            changes,
        })
    }

    /// Placeholder analysis reported when the upstream step could not run.
    pub fn failed(headline: &str, message: &str) -> Self {
        Self {
            is_relevant: false,
            original_headline: headline.to_string(),
            score: 0,
            criteria_results: vec![
                CriterionResult::new(1, false, message),
                CriterionResult::new(2, false, STOPPED),
                CriterionResult::new(3, false, STOPPED),
            ],
            improved_headline: FAILED_REWRITE.to_string(),
            changes: Vec::new(),
        }
    }
}

/// Parse the reasoning step's JSON reply for `headline` and recompute its score.
/// The headline echoed back in the reply is discarded.
pub fn finalize_analysis(headline: &str, raw_json: &str) -> Result<HeadlineAnalysis, AnalysisError> {
    let raw: RawAnalysis = serde_json::from_str(raw_json)?;
    let body = raw.analysis;
    HeadlineAnalysis::from_results(
        headline,
        body.is_relevant,
        body.criteria_results,
        body.improved_headline,
        body.changes,
    )
    .map_err(|e| {
        warn!(error = %e, "rejected criterion results");
        AnalysisError::Score(e)
    })
}
