//! Likert survey submissions: validation of a single reader's answers and
//! per-question aggregation across submissions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const QUESTION_COUNT: usize = 5;
/// Answers are 0..=MAX_ANSWER on a five-point scale.
pub const MAX_ANSWER: u8 = 4;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("malformed submission: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field {0} must not be empty")]
    EmptyField(&'static str),

    #[error("exactly {QUESTION_COUNT} question responses required, got {0}")]
    ResponseCount(usize),

    #[error("invalid response format for question {question_id}")]
    InvalidResponse { question_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question_id: u32,
    pub question_text: String,
    pub answer: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub session_id: String,
    pub article_id: u64,
    pub article_title: String,
    pub article_content: String,
    pub article_date: String,
    pub article_word_count: u64,
    pub is_rewritten: bool,
    pub timestamp: String,
    pub responses: Vec<QuestionResponse>,
}

impl SurveySubmission {
    pub fn validate(&self) -> Result<(), SurveyError> {
        if self.session_id.is_empty() {
            return Err(SurveyError::EmptyField("sessionId"));
        }
        if self.responses.len() != QUESTION_COUNT {
            return Err(SurveyError::ResponseCount(self.responses.len()));
        }
        for r in &self.responses {
            if r.question_id == 0 || r.question_text.is_empty() || r.answer > MAX_ANSWER {
                return Err(SurveyError::InvalidResponse {
                    question_id: r.question_id,
                });
            }
        }
        Ok(())
    }

    pub fn answer(&self, question_id: u32) -> Option<u8> {
        self.responses
            .iter()
            .find(|r| r.question_id == question_id)
            .map(|r| r.answer)
    }
}

/// Parse and validate one submission. Missing or mistyped fields are
/// rejected by the deserializer.
pub fn parse_submission(json: &str) -> Result<SurveySubmission, SurveyError> {
    let submission: SurveySubmission = serde_json::from_str(json)?;
    submission.validate()?;
    Ok(submission)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: u32,
    pub rewritten_avg: f64,
    pub original_avg: f64,
    pub rewritten_distribution: [usize; MAX_ANSWER as usize + 1],
    pub original_distribution: [usize; MAX_ANSWER as usize + 1],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub total_responses: usize,
    pub rewritten_count: usize,
    pub original_count: usize,
    pub question_stats: Vec<QuestionStats>,
}

fn average(group: &[&SurveySubmission], question_id: u32) -> f64 {
    let answers: Vec<u8> = group.iter().filter_map(|s| s.answer(question_id)).collect();
    if answers.is_empty() {
        return 0.0;
    }
    answers.iter().map(|&a| f64::from(a)).sum::<f64>() / answers.len() as f64
}

fn distribution(group: &[&SurveySubmission], question_id: u32) -> [usize; MAX_ANSWER as usize + 1] {
    let mut buckets = [0usize; MAX_ANSWER as usize + 1];
    for answer in group.iter().filter_map(|s| s.answer(question_id)) {
        if let Some(bucket) = buckets.get_mut(usize::from(answer)) {
            *bucket += 1;
        }
    }
    buckets
}

/// Compare answers between readers shown the rewritten and the original headline.
pub fn summarize(submissions: &[SurveySubmission]) -> SurveySummary {
    let (rewritten, original): (Vec<&SurveySubmission>, Vec<&SurveySubmission>) =
        submissions.iter().partition(|s| s.is_rewritten);

    let question_stats = (1..=QUESTION_COUNT as u32)
        .map(|question_id| QuestionStats {
            question_id,
            rewritten_avg: average(&rewritten, question_id),
            original_avg: average(&original, question_id),
            rewritten_distribution: distribution(&rewritten, question_id),
            original_distribution: distribution(&original, question_id),
        })
        .collect();

    SurveySummary {
        total_responses: submissions.len(),
        rewritten_count: rewritten.len(),
        original_count: original.len(),
        question_stats,
    }
}
