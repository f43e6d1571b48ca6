pub mod analysis;
pub mod catalog;
pub mod prompt;
pub mod resolver;
pub mod scorer;
pub mod survey;
mod wire;

pub use analysis::{finalize_analysis, AnalysisError, CriterionChange, HeadlineAnalysis};
pub use catalog::{Catalog, CatalogError, Category, PatternRule, RuleDef, CATALOG, RULES};
pub use prompt::{build_prompt, irrelevant_reply, PromptError};
pub use resolver::{annotate, annotate_with, coverage, coverage_with, AnnotatedSpan, Coverage};
pub use scorer::{criterion, score, Criterion, CriterionResult, ScoreError, CRITERIA, MAX_SCORE};
pub use survey::{parse_submission, summarize, SurveyError, SurveySubmission, SurveySummary};
