//! Keyword classification of thinking-stage sentences
//!
//! Each sentence of a reasoning transcript is assigned to exactly one
//! category by testing a fixed, ordered table of keyword patterns. The first
//! category with any match wins; `General` is the fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The seven reasoning-stage categories, in match-priority order.
///
/// Order matters: a sentence matching keywords from two categories is
/// assigned to whichever is declared earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Analysis,
    Planning,
    Research,
    Synthesis,
    Evaluation,
    ProblemSolving,
    General,
}

/// Keyword patterns per category. `General` has none; it is the fallback.
const PATTERN_TABLE: &[(Category, &[&str])] = &[
    (Category::Analysis, &["analyz", "examin", "consider", "look at"]),
    (Category::Planning, &["plan", "structur", "organiz", "approach"]),
    (Category::Research, &["research", "information", "fact", "data"]),
    (Category::Synthesis, &["combin", "integrat", "put together", "synthes"]),
    (Category::Evaluation, &["evaluat", "assess", "compar", "weigh"]),
    (Category::ProblemSolving, &["solv", "fix", "address", "method"]),
];

static COMPILED_PATTERNS: Lazy<Vec<(Category, Vec<Regex>)>> = Lazy::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(category, patterns)| {
            let regexes = patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid stage pattern"))
                .collect();
            (*category, regexes)
        })
        .collect()
});

impl Category {
    /// Classify a lowercased sentence into a stage category.
    ///
    /// First-match policy over the declared category order. Total over any
    /// input; an empty string classifies as `General`.
    pub fn classify(text: &str) -> Category {
        for (category, regexes) in COMPILED_PATTERNS.iter() {
            if regexes.iter().any(|re| re.is_match(text)) {
                return *category;
            }
        }
        Category::General
    }

    /// Human-readable display name ("Problem Solving", not "problem_solving").
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Analysis => "Analysis",
            Category::Planning => "Planning",
            Category::Research => "Research",
            Category::Synthesis => "Synthesis",
            Category::Evaluation => "Evaluation",
            Category::ProblemSolving => "Problem Solving",
            Category::General => "General",
        }
    }

    /// Fixed chart color for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Analysis => "#FF6B6B",
            Category::Planning => "#4ECDC4",
            Category::Research => "#45B7D1",
            Category::Synthesis => "#FFA07A",
            Category::Evaluation => "#98D8C8",
            Category::ProblemSolving => "#F7DC6F",
            Category::General => "#BDC3C7",
        }
    }
}

/// Fallback color for labels outside the category table.
pub const NEUTRAL_COLOR: &str = "#BDC3C7";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_keywords_match_their_category() {
        assert_eq!(Category::classify("let me analyze this problem"), Category::Analysis);
        assert_eq!(Category::classify("i will organize my thoughts"), Category::Planning);
        assert_eq!(Category::classify("gathering more information"), Category::Research);
        assert_eq!(Category::classify("now i combine these ideas"), Category::Synthesis);
        assert_eq!(Category::classify("assessing the options"), Category::Evaluation);
        assert_eq!(Category::classify("a method to fix this"), Category::ProblemSolving);
    }

    #[test]
    fn test_no_match_falls_back_to_general() {
        assert_eq!(Category::classify("hello world"), Category::General);
        assert_eq!(Category::classify(""), Category::General);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // "analyz" (analysis) and "plan" (planning) both match; analysis is
        // declared first.
        assert_eq!(
            Category::classify("i will analyze the plan"),
            Category::Analysis
        );
        // "plan" (planning) beats "solv" (problem_solving).
        assert_eq!(
            Category::classify("my plan is to solve it"),
            Category::Planning
        );
    }

    #[test]
    fn test_pattern_matches_anywhere_in_sentence() {
        assert_eq!(
            Category::classify("this requires careful examination"),
            Category::Analysis
        );
    }

    #[test]
    fn test_display_names_and_colors() {
        assert_eq!(Category::ProblemSolving.display_name(), "Problem Solving");
        assert_eq!(Category::General.color(), NEUTRAL_COLOR);
    }
}
