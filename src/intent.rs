//! Intent classification.
//!
//! [`classify`] maps free text onto the closed [`IntentCategory`] set by testing a
//! narrow keyword pattern per category in fixed priority order. [`confidence`]
//! counts hits of a broader per-category pattern. [`analyze`] combines both with
//! category-independent signal tags.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Debug,
    Implementation,
    Research,
    Documentation,
    Planning,
    General,
}

impl IntentCategory {
    /// Classifiable categories in priority order. `General` is the fallback and is
    /// never matched by a pattern.
    pub const PRIORITY: [IntentCategory; 5] = [
        Self::Debug,
        Self::Implementation,
        Self::Research,
        Self::Documentation,
        Self::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Implementation => "implementation",
            Self::Research => "research",
            Self::Documentation => "documentation",
            Self::Planning => "planning",
            Self::General => "general",
        }
    }

    fn index(&self) -> Option<usize> {
        Self::PRIORITY.iter().position(|c| c == self)
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentAnalysis {
    pub intent: IntentCategory,
    pub confidence: f64,
    pub signals: Vec<&'static str>,
    pub alternatives: Vec<IntentCategory>,
}

const CONFIDENCE_FLOOR: f64 = 0.5;
const CONFIDENCE_CEILING: f64 = 0.95;
const CONFIDENCE_PER_MATCH: f64 = 0.1;
const ALTERNATIVE_THRESHOLD: f64 = 0.6;
const MAX_ALTERNATIVES: usize = 2;

const CLASSIFY_PATTERNS: [&str; 5] = [
    r"(?i)\b(debug\w*|fix\w*|bug\w*|errors?|issues?|broken|crash\w*|fail\w*)\b",
    r"(?i)\b(implement\w*|build\w*|create\w*|add|adding|develop\w*|code|coding)\b",
    r"(?i)\b(research\w*|explor\w*|investigat\w*|learn\w*|understand\w*|study|studying)\b",
    r"(?i)\b(document\w*|docs?|readme|explain\w*|describ\w*)\b",
    r"(?i)\b(plan|plans|planning|design\w*|architect\w*|roadmap|strateg\w*)\b",
];

const CONFIDENCE_PATTERNS: [&str; 5] = [
    r"(?i)\b(debug\w*|fix\w*|bug\w*|errors?|issues?|broken|crash\w*|fail\w*|exceptions?|stack ?traces?|problems?|wrong|regressions?)\b",
    r"(?i)\b(implement\w*|build\w*|create\w*|add|adding|develop\w*|code|coding|features?|write|writing|refactor\w*|functions?|modules?)\b",
    r"(?i)\b(research\w*|explor\w*|investigat\w*|learn\w*|understand\w*|study|studying|compar\w*|analy[sz]\w*|papers?|how does)\b",
    r"(?i)\b(document\w*|docs?|readme|explain\w*|describ\w*|guides?|tutorials?|notes?|comments?|summar\w*)\b",
    r"(?i)\b(plan|plans|planning|design\w*|architect\w*|roadmap|strateg\w*|organi[sz]\w*|outlin\w*|schedul\w*|milestones?|priorit\w*)\b",
];

const SIGNAL_PATTERNS: [(&str, &str); 4] = [
    ("question", r"(?i)\?|^\s*(how|what|why|when|where|which|who|can|should|is|are|does|do)\b"),
    ("problem-solving", r"(?i)\b(debug\w*|fix\w*|solv\w*|issues?|problems?|errors?|bug\w*|broken|fail\w*|troubleshoot\w*)\b"),
    ("creation", r"(?i)\b(create\w*|build\w*|make|making|new|implement\w*|write|writing|add|adding|generat\w*)\b"),
    ("research", r"(?i)\b(research\w*|explor\w*|learn\w*|understand\w*|investigat\w*|compar\w*|study|studying)\b"),
];

struct Patterns {
    classify: Vec<Regex>,
    confidence: Vec<Regex>,
    signals: Vec<(&'static str, Regex)>,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    // Patterns are compile-time constants covered by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid intent pattern {pattern}: {e}"))
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        classify: CLASSIFY_PATTERNS.iter().map(|p| compile(p)).collect(),
        confidence: CONFIDENCE_PATTERNS.iter().map(|p| compile(p)).collect(),
        signals: SIGNAL_PATTERNS
            .iter()
            .map(|(tag, p)| (*tag, compile(p)))
            .collect(),
    })
}

/// First category (in priority order) whose pattern matches, else `General`.
pub fn classify(text: &str) -> IntentCategory {
    let patterns = patterns();
    IntentCategory::PRIORITY
        .iter()
        .zip(&patterns.classify)
        .find(|(_, re)| re.is_match(text))
        .map(|(category, _)| *category)
        .unwrap_or(IntentCategory::General)
}

/// `min(0.5 + 0.1 × hits, 0.95)` over the category's broad keyword set.
pub fn confidence(text: &str, category: IntentCategory) -> f64 {
    let Some(index) = category.index() else {
        return CONFIDENCE_FLOOR;
    };
    let hits = patterns().confidence[index].find_iter(text).count();
    if hits == 0 {
        return CONFIDENCE_FLOOR;
    }
    (CONFIDENCE_FLOOR + CONFIDENCE_PER_MATCH * hits as f64).min(CONFIDENCE_CEILING)
}

pub fn analyze(text: &str) -> IntentAnalysis {
    let intent = classify(text);
    let confidence = confidence(text, intent);

    let signals = patterns()
        .signals
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(tag, _)| *tag)
        .collect();

    let alternatives = IntentCategory::PRIORITY
        .iter()
        .copied()
        .filter(|category| *category != intent)
        .filter(|category| self::confidence(text, *category) > ALTERNATIVE_THRESHOLD)
        .take(MAX_ALTERNATIVES)
        .collect();

    IntentAnalysis {
        intent,
        confidence,
        signals,
        alternatives,
    }
}
