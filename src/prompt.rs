//! Request text for the external reasoning step.
//!
//! The reply contract described here is the one [`crate::finalize_analysis`]
//! parses: `{ "analysis": { isRelevant, criteriaResults, improvedHeadline, changes } }`.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("headline is empty")]
    EmptyHeadline,

    #[error("article body is empty")]
    EmptyArticle,
}

const TASK: &str = "\
You are a journalism expert specializing in traffic crash reporting.

Your task is to:
1. Determine whether the article is about a traffic crash (e.g., car crash, pedestrian hit, bicycle accident).
2. Analyze the headline against three humanization criteria.
3. If it's a crash article, rewrite the headline to better meet all three criteria.

## Criteria Definitions:

1. MENTION ALL PARTIES:
Yes if every party the article names as involved in the crash is referenced in the headline, either as a person \
(\"woman\", \"driver\") or by their vehicle (\"car\", \"truck\"). For single-party crashes, Yes if that party is mentioned.
No if any key party is omitted.

2. USE HUMAN TERMS:
Yes if every party in the headline is described with human terms (\"woman\", \"child\", \"person\"), \
role-based terms (\"driver\", \"pedestrian\", \"cyclist\") or quantified human references (\"two people\").
No if any party is described as a transportation mode (\"car\", \"bicycle\"), \
a dehumanizing statistic (\"1 killed\", \"fatality\") or a bare number (\"1 dead in crash\").

3. ACTIVE VOICE:
Yes if the headline uses active voice to clearly show who performed the action.
No if it uses passive constructions that obscure agency (\"was struck\", \"killed in crash\", \"dies\") \
or outcome-only descriptions (\"X injured\").

For example:
\"Driver of truck strikes and kills man riding bicycle in East Vancouver crash\" passes all criteria,
while \"Cyclist dead after East Vancouver crash\" passes none.
\"Taxi driver strikes man crossing street in Amsterdam, injuring him during morning rush hour\" passes all criteria,
while \"Amsterdam taxi driver in custody after crash sends pedestrian to the hospital\" passes 1.
";

const REWRITE: &str = "\
2. If the article IS about a traffic crash:
- Analyze each of the three criteria and provide criterionId (1 | 2 | 3), passed (true | false) and explanation (brief justification).
- Rewrite the headline so it mentions all parties involved in the crash, uses human terms instead of \
transportation modes, and uses active voice that clearly shows who did what to whom.

The rewritten headline should:
- Be in similar style to the original headline
- Be appropriate for a news article
- Be concise and clear
- Not assign blame to victims beyond what is factually stated in the article
- Avoid naming specific car models or brands and be respectful of the victims
- Focus on human impact rather than traffic disruption
- Be in the same language as the original headline

Example:
Original Headline: \"Man killed in car crash\"
Rewritten Headline: \"Driver of car kills man in crash\"
Differences: the original uses passive voice and omits the driver.

## Output Format (as JSON):
{
  \"analysis\": {
    \"isRelevant\": true | false,
    \"originalHeadline\": \"original headline here\",
    \"criteriaResults\": [
      { \"criterionId\": 1, \"passed\": true | false, \"explanation\": \"...\" },
      { \"criterionId\": 2, \"passed\": true | false, \"explanation\": \"...\" },
      { \"criterionId\": 3, \"passed\": true | false, \"explanation\": \"...\" }
    ],
    \"improvedHeadline\": \"rewritten headline here\",
    \"changes\": [
      { \"criterionId\": 1 | 2 | 3, \"explanation\": \"...\" }
    ]
  }
}
Only list changes for criteria that were changed or originally violated.
";

/// The reply expected when the article is not about a traffic crash.
pub fn irrelevant_reply(headline: &str) -> Value {
    json!({
        "analysis": {
            "isRelevant": false,
            "originalHeadline": headline,
            "criteriaResults": [],
            "improvedHeadline": "",
            "changes": [],
        }
    })
}

/// Build the combined relevance, critique and rewrite request.
pub fn build_prompt(headline: &str, article_body: &str) -> Result<String, PromptError> {
    let headline = headline.trim();
    if headline.is_empty() {
        return Err(PromptError::EmptyHeadline);
    }
    let article_body = article_body.trim();
    if article_body.is_empty() {
        return Err(PromptError::EmptyArticle);
    }

    let mut prompt = String::with_capacity(TASK.len() + REWRITE.len() + article_body.len() + 512);
    prompt.push_str(TASK);
    prompt.push_str("\n## Input:\nHeadline: \"");
    prompt.push_str(headline);
    prompt.push_str("\"\n\nArticle Body:\n");
    prompt.push_str(article_body);
    prompt.push_str(
        "\n\n## Instructions:\n1. If the article is NOT about a traffic crash, return the following JSON:\n",
    );
    prompt.push_str(&format!("{:#}", irrelevant_reply(headline)));
    prompt.push_str("\n\n");
    prompt.push_str(REWRITE);
    Ok(prompt)
}
