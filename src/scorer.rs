use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::null_as_default;

pub const MAX_SCORE: u8 = 3;

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Criterion {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
}

/// Ordered by importance. Failing one caps the score at the criteria before it.
pub static CRITERIA: [Criterion; 3] = [
    Criterion {
        id: 1,
        name: "Mention all parties",
        description: "Every party involved in the crash is referenced, either as a person or by their vehicle.",
    },
    Criterion {
        id: 2,
        name: "Use human terms",
        description: "Parties are described as people or by role, not as transportation modes or bare numbers.",
    },
    Criterion {
        id: 3,
        name: "Active voice",
        description: "The headline clearly shows who did what to whom.",
    },
];

pub fn criterion(id: u8) -> Option<&'static Criterion> {
    CRITERIA.iter().find(|c| c.id == id)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// One externally produced pass/fail judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResult {
    pub criterion_id: u8,
    pub passed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

impl CriterionResult {
    pub fn new(criterion_id: u8, passed: bool, explanation: impl Into<String>) -> Self {
        Self {
            criterion_id,
            passed,
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("criterion {0} appears more than once")]
    DuplicateCriterion(u8),

    #[error("unknown criterion id {0}, expected 1, 2 or 3")]
    UnknownCriterion(u8),
}

/// Tiered score in `0..=3`: the number of leading criteria, in id order,
/// that passed. A missing criterion counts as failed.
pub fn score(results: &[CriterionResult]) -> Result<u8, ScoreError> {
    let mut verdicts: [Option<bool>; MAX_SCORE as usize] = [None; MAX_SCORE as usize];
    for r in results {
        let slot = match r.criterion_id {
            id @ 1..=MAX_SCORE => &mut verdicts[usize::from(id - 1)],
            id => return Err(ScoreError::UnknownCriterion(id)),
        };
        if slot.replace(r.passed).is_some() {
            return Err(ScoreError::DuplicateCriterion(r.criterion_id));
        }
    }

    let leading = verdicts.iter().take_while(|v| **v == Some(true)).count();
    Ok(leading as u8)
}
