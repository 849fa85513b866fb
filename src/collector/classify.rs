// src/collector/classify.rs
//! Classifies unlabeled detail fragments of a card.
//!
//! Rules are evaluated in order and the first match wins. Fragments no rule
//! claims are skills.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Level,
    Experience,
    Skill,
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub target: DetailField,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish()
    }
}

fn mentions_level(text: &str) -> bool {
    text.contains("Level")
}

fn mentions_years(text: &str) -> bool {
    text.contains("Yrs")
}

pub const DEFAULT_RULES: &[Rule] = &[
    Rule {
        name: "career level",
        matches: mentions_level,
        target: DetailField::Level,
    },
    Rule {
        name: "years of experience",
        matches: mentions_years,
        target: DetailField::Experience,
    },
];

#[derive(Debug, Clone)]
pub struct DetailClassifier {
    rules: Vec<Rule>,
}

impl Default for DetailClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl DetailClassifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, fragment: &str) -> DetailField {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(fragment))
            .map(|rule| rule.target)
            .unwrap_or(DetailField::Skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let classifier = DetailClassifier::default();
        assert_eq!(classifier.classify("Entry Level"), DetailField::Level);
        assert_eq!(classifier.classify("Experienced (Non-Manager) Level"), DetailField::Level);
        assert_eq!(classifier.classify("2 - 3 Yrs of Exp"), DetailField::Experience);
        assert_eq!(classifier.classify("Python"), DetailField::Skill);
        assert_eq!(classifier.classify(""), DetailField::Skill);
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = DetailClassifier::default();
        // Both rules match; "Level" is listed first.
        assert_eq!(classifier.classify("Level 3+ Yrs"), DetailField::Level);

        let reordered = DetailClassifier::new(vec![DEFAULT_RULES[1], DEFAULT_RULES[0]]);
        assert_eq!(reordered.classify("Level 3+ Yrs"), DetailField::Experience);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let classifier = DetailClassifier::default();
        assert_eq!(classifier.classify("level design"), DetailField::Skill);
    }

    #[test]
    fn test_empty_rule_list_yields_skills() {
        let classifier = DetailClassifier::new(Vec::new());
        assert_eq!(classifier.classify("Entry Level"), DetailField::Skill);
    }
}
