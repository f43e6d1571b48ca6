use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Category, CATALOG};

/// Character substituted for annotated text in a coverage mask.
pub const COVERED: char = '\u{2588}';

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A highlighted stretch of the headline. Offsets are byte offsets into the
/// input, `end_index` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSpan {
    pub text: String,
    pub explanation: &'static str,
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub headline: String,
    pub match_count: usize,
    pub coverage_mask: String,
}

struct RawMatch {
    start: usize,
    end: usize,
    priority: u8,
    explanation: &'static str,
    category: Option<Category>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn collect_matches(catalog: &Catalog, headline: &str) -> Vec<RawMatch> {
    let mut found = Vec::new();
    for rule in catalog.rules() {
        let priority = rule.priority();
        for pattern in &rule.patterns {
            for m in pattern.find_iter(headline) {
                if m.as_str().is_empty() {
                    continue;
                }
                found.push(RawMatch {
                    start: m.start(),
                    end: m.end(),
                    priority,
                    explanation: rule.explanation,
                    category: rule.category,
                });
            }
        }
    }
    found
}

/// Greedy interval sweep: earliest start first, higher priority on equal
/// starts, table order on full ties (the sort is stable).
fn resolve(mut found: Vec<RawMatch>) -> Vec<RawMatch> {
    found.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.priority.cmp(&a.priority))
    });

    let mut kept: Vec<RawMatch> = Vec::new();
    let mut last_end = 0usize;
    for m in found {
        if m.start >= last_end {
            last_end = m.end;
            kept.push(m);
        }
    }
    kept
}

/// Annotate a headline against a caller-supplied catalog.
pub fn annotate_with(catalog: &Catalog, headline: &str) -> Vec<AnnotatedSpan> {
    if headline.is_empty() {
        return Vec::new();
    }

    let found = collect_matches(catalog, headline);
    let raw = found.len();
    let kept = resolve(found);
    debug!(raw, kept = kept.len(), "annotated headline");

    kept.into_iter()
        .map(|m| AnnotatedSpan {
            text: headline[m.start..m.end].to_string(),
            explanation: m.explanation,
            start_index: m.start,
            end_index: m.end,
            category: m.category,
        })
        .collect()
}

/// Annotate a headline with the built-in catalog. The result is sorted by
/// `start_index` and no two spans overlap.
pub fn annotate(headline: &str) -> Vec<AnnotatedSpan> {
    annotate_with(&CATALOG, headline)
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

pub fn coverage_with(catalog: &Catalog, headline: &str) -> Coverage {
    let spans = annotate_with(catalog, headline);

    let mut pending = spans.iter().peekable();
    let mut mask = String::with_capacity(headline.len());
    for (i, c) in headline.char_indices() {
        while pending.next_if(|s| s.end_index <= i).is_some() {}
        let covered = pending.peek().is_some_and(|s| s.start_index <= i);
        mask.push(if covered { COVERED } else { c });
    }

    Coverage {
        headline: headline.to_string(),
        match_count: spans.len(),
        coverage_mask: mask,
    }
}

/// Mask every annotated character of `headline` with [`COVERED`].
pub fn coverage(headline: &str) -> Coverage {
    coverage_with(&CATALOG, headline)
}
