use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Framing category attached to every annotated span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ActiveVoice,
    PassiveVoice,
    VehicleAsSubject,
    Humanization,
    Blame,
    OutcomeFocused,
    RoleBased,
    VehicleTerms,
    CrashTerminology,
    Statistical,
    CausationIndicator,
    TrafficFocus,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::ActiveVoice,
        Category::PassiveVoice,
        Category::VehicleAsSubject,
        Category::Humanization,
        Category::Blame,
        Category::OutcomeFocused,
        Category::RoleBased,
        Category::VehicleTerms,
        Category::CrashTerminology,
        Category::Statistical,
        Category::CausationIndicator,
        Category::TrafficFocus,
    ];

    /// Tie-break weight for spans starting at the same offset. Higher wins.
    pub fn priority(self) -> u8 {
        match self {
            Category::ActiveVoice | Category::PassiveVoice => 5,
            Category::VehicleAsSubject => 4,
            Category::Humanization | Category::Blame => 3,
            Category::OutcomeFocused | Category::RoleBased => 2,
            Category::VehicleTerms
            | Category::CrashTerminology
            | Category::Statistical
            | Category::CausationIndicator
            | Category::TrafficFocus => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ActiveVoice => "active-voice",
            Category::PassiveVoice => "passive-voice",
            Category::VehicleAsSubject => "vehicle-as-subject",
            Category::Humanization => "humanization",
            Category::Blame => "blame",
            Category::OutcomeFocused => "outcome-focused",
            Category::RoleBased => "role-based",
            Category::VehicleTerms => "vehicle-terms",
            Category::CrashTerminology => "crash-terminology",
            Category::Statistical => "statistical",
            Category::CausationIndicator => "causation-indicator",
            Category::TrafficFocus => "traffic-focus",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uncategorized rules sort below every known category.
pub fn priority_of(category: Option<Category>) -> u8 {
    category.map_or(0, Category::priority)
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Uncompiled rule as authored in a static table.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub patterns: &'static [&'static str],
    pub explanation: &'static str,
    pub category: Option<Category>,
}

pub static RULES: &[RuleDef] = &[
    // Death
    RuleDef {
        patterns: &[
            r"\b(die|dies|died|dying|dead)\b",
            r"\b(death|deaths)\b",
            r"\b(fatal|fatally)\b",
            r"\b(fatalities?)\b",
            r"\b(life|lives)\s+(lost|claimed)\b",
        ],
        explanation: "Focuses on the outcome without explaining how it happened. It can make deaths seem spontaneous rather than the result of specific actions.",
        category: Some(Category::OutcomeFocused),
    },
    // Injury
    RuleDef {
        patterns: &[
            r"\b(injured?|injuries)\b",
            r"\b(hurt)\b",
            r"\b(wounded)\b",
            r"\b(harmed)\b",
            r"\b(hospitalized)\b",
            r"\b(critical|serious)\s+(condition|injuries)\b",
        ],
        explanation: "Describes the outcome but not the cause. Including who or what caused the injury provides clearer context.",
        category: Some(Category::OutcomeFocused),
    },
    RuleDef {
        patterns: &[
            r"\b(hit|struck|killed|injured|hurt)\b",
            r"\b(was|were)\s+(hit|struck|killed|injured|hurt)\b",
            r"\b(got|gets|getting)\s+(hit|struck|killed|injured)\b",
            r"\b(been)\s+(hit|struck|killed|injured)\b",
            r"\b(became|becomes)\s+victim\b",
            r"\bfound\s+(dead|injured)\b",
        ],
        explanation: "Passive voice removes the actor from the sentence. It can make it unclear who performed the action.",
        category: Some(Category::PassiveVoice),
    },
    RuleDef {
        patterns: &[
            r"\b(strikes?)\b",
            r"\b(hits?|hitting)\b",
            r"\b(kills?|killing)\b",
            r"\b(injures?|injuring)\b",
            r"\b(crashes?|crashing)\s+into\b",
            r"\b(ploughs?|ploughing)\s+into\b",
            r"\b(runs?|ran|running)\s+(over|down|into)\b",
            r"\b(collides?|collided|colliding)\s+with\b",
        ],
        explanation: "Active voice clearly shows who performed the action. This helps readers understand the sequence of events.",
        category: Some(Category::ActiveVoice),
    },
    RuleDef {
        patterns: &[
            r"\b(car|truck|vehicle|van|bus|SUV|sedan|pickup|lorry|semi|motorcycle|scooter|moped)\s+(hits?|strikes?|kills?|injures?|crashes?|collides?|plou?ghs?|slams?|runs?\s+over|runs?\s+down|mows?\s+down)",
            r"\b(car|truck|vehicle|van|bus|SUV|sedan|pickup|lorry|semi|motorcycle|scooter|moped)\s+(involved|responsible)",
        ],
        explanation: "Treats the vehicle as if it acted on its own. Vehicles don't drive themselves. People do.",
        category: Some(Category::VehicleAsSubject),
    },
    RuleDef {
        patterns: &[
            r"\b(man|woman|person|child|teenager|boy|girl|toddler|infant|adult|elderly)\b",
            r"\b(man|woman|person|teenager)\s+(driving|operating)\s+(car|truck|vehicle|van|bus|SUV|sedan|pickup|lorry|semi|motorcycle|scooter|moped)\b",
            r"\b(mother|father|parent|student|worker|resident)\b",
            r"\b\d+[\s-]?year[\s-]?old\b",
        ],
        explanation: "Human term that helps readers connect with the people affected.",
        category: Some(Category::Humanization),
    },
    RuleDef {
        patterns: &[r"\b(car|truck|vehicle|van|bus|SUV|taxi|sedan|pickup|lorry|semi|motorcycle|scooter|moped)\b"],
        explanation: "When used without human context, vehicle terms make the story feel mechanical rather than human.",
        category: Some(Category::VehicleTerms),
    },
    RuleDef {
        patterns: &[
            r"\b(driver|motorist|operator)\s+(of|in)\s+(the\s+)?(car|truck|vehicle|van|bus|SUV|sedan|pickup|lorry|semi|taxi)",
            r"\b(car|truck|bus|taxi)\s+(driver|motorist|operator)\b",
            r"\b(cyclist|bicyclist|biker)\b",
            r"\b(pedestrian|walker|jogger|runner)\b",
            r"\b(motorist|driver)\b",
            r"\b(motorcyclist)\b",
        ],
        explanation: "Identifies people by their specific roles and activities rather than just their vehicles.",
        category: Some(Category::RoleBased),
    },
    RuleDef {
        patterns: &[r"\b(accidents?)\b", r"\b(mishaps?)\b"],
        explanation: "'Accident' suggests something unavoidable. Most crashes result from specific actions or choices, not random chance.",
        category: Some(Category::CrashTerminology),
    },
    RuleDef {
        patterns: &[r"\b(crash|crashes|crashed|crashing)\b", r"\b(collision|collisions)\b"],
        explanation: "Describes the event without suggesting it was inevitable or unavoidable.",
        category: Some(Category::CrashTerminology),
    },
    RuleDef {
        patterns: &[
            r"\b(jaywalking|jaywalked|jaywalker)\b",
            r"\b(darted?|darting)\s+(out|into|across)\b",
            r"\b(ran|runs?|running)\s+(into\s+)?(traffic|street|road)\b",
            r"\b(failed\s+to|failure\s+to)\s+(yield|stop|signal|look)\b",
            r"\b(reckless|careless|negligent|irresponsible)\b",
            r"\b(at\s+fault|to\s+blame|responsible\s+for)\b",
        ],
        explanation: "This language assigns blame and shifts focus away from the root causes that make our streets dangerous.",
        category: Some(Category::Blame),
    },
    RuleDef {
        patterns: &[
            r"\b(caused|causing|causes)\b",
            r"\b(resulted\s+in|resulting\s+in)\b",
            r"\b(led\s+to|leading\s+to)\b",
            r"\b(responsible\s+for)\b",
        ],
        explanation: "Helps establish cause and effect, making it clear how events unfolded.",
        category: Some(Category::CausationIndicator),
    },
    RuleDef {
        patterns: &[r"\b\d+\s+(killed|dead|died|injured|hurt)\b"],
        explanation: "Numbers alone can make tragedies feel abstract and distance readers from the human impact of crashes.",
        category: Some(Category::Statistical),
    },
    RuleDef {
        patterns: &[
            r"\b(traffic|commute|delays?|delayed|congestion|blocked|blocking|backs?\s+up|backed\s+up|disrupted|disruption|closed|closure)\b",
            r"\b(hours|minutes)\s+(of\s+)?delays?\b",
            r"\bmajor\s+(delays?|disruption|impact\s+on\s+traffic)\b",
            r"\b(avoid\s+the\s+area|seek\s+alternate\s+routes?|plan\s+extra\s+time)\b",
        ],
        explanation: "Treats crashes as traffic problems rather than human tragedies.",
        category: Some(Category::TrafficFocus),
    },
];

// ---------------------------------------------------------------------------
// Compiled catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule '{explanation}' has no patterns")]
    EmptyRule { explanation: &'static str },

    #[error("invalid pattern {pattern:?} in {category} rule: {source}")]
    InvalidPattern {
        category: String,
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    pub patterns: Vec<Regex>,
    pub explanation: &'static str,
    pub category: Option<Category>,
}

impl PatternRule {
    pub fn priority(&self) -> u8 {
        priority_of(self.category)
    }
}

/// Rewrite an authored pattern so that `\b`, `\d` and case folding are
/// ASCII-only while `\s` keeps matching Unicode whitespace. A non-ASCII
/// letter is never a word character and never folds onto an ASCII one.
///
/// Character classes are copied verbatim; a class containing `\s` is wrapped
/// in a Unicode group. Nested classes are not supported.
pub fn ascii_semantics(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    out.push_str("(?i-u:");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('s') => out.push_str(r"(?u:\s)"),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '[' => {
                let mut class = String::from("[");
                let mut escaped = false;
                for c in chars.by_ref() {
                    class.push(c);
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == ']' {
                        break;
                    }
                }
                if class.contains(r"\s") {
                    out.push_str("(?u:");
                    out.push_str(&class);
                    out.push(')');
                } else {
                    out.push_str(&class);
                }
            }
            _ => out.push(c),
        }
    }
    out.push(')');
    out
}

/// Ordered, immutable set of compiled rules.
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: Vec<PatternRule>,
}

impl Catalog {
    /// Compile every pattern through [`ascii_semantics`]. Any bad pattern
    /// rejects the whole table.
    pub fn new(defs: &[RuleDef]) -> Result<Self, CatalogError> {
        let mut rules = Vec::with_capacity(defs.len());
        for def in defs {
            if def.patterns.is_empty() {
                return Err(CatalogError::EmptyRule {
                    explanation: def.explanation,
                });
            }
            let patterns = def
                .patterns
                .iter()
                .map(|&p| {
                    Regex::new(&ascii_semantics(p))
                        .map_err(|source| CatalogError::InvalidPattern {
                            category: def
                                .category
                                .map_or_else(|| "uncategorized".to_string(), |c| c.to_string()),
                            pattern: p,
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(PatternRule {
                patterns,
                explanation: def.explanation,
                category: def.category,
            });
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.rules.iter().map(|r| r.patterns.len()).sum()
    }
}

pub static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let catalog = Catalog::new(RULES).expect("built-in headline rules must compile");
    debug!(
        rules = catalog.len(),
        patterns = catalog.pattern_count(),
        "compiled headline catalog"
    );
    catalog
});
