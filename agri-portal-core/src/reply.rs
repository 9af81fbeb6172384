//! Reply Matcher
//!
//! Answers free-text chat input by scanning an ordered list of keyword
//! patterns. The first rule whose pattern matches anywhere in the text wins;
//! when nothing matches, a fixed fallback reply is returned.
//!
//! Rule order is load-bearing: "rain" and "yield" in the same message yields
//! the weather reply because the weather rule is declared first.

use regex::{Regex, RegexBuilder};

use crate::error::ReplyRuleError;

/// Reply returned when no rule matches
pub const FALLBACK_REPLY: &str =
    "I will learn this soon. Ask about yield, weather, disease or fertilizer for now.";

/// Built-in rules, evaluated top to bottom
const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "rain|weather",
        "Weather: 5-day forecast integration planned. Meanwhile use the Weather service panel.",
    ),
    (
        "fertilizer|nutrient",
        "Fertilizer: Provide recent N-P-K and pH to refine balancing suggestions.",
    ),
    (
        "disease|pest",
        "Disease: Moisture + temperature + crop stage influence risk scoring.",
    ),
    (
        "yield",
        "Yield: Historical yield + soil chemistry + forecast alignment determine estimate bands.",
    ),
];

/// A single keyword pattern and its canned reply
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    reply: String,
}

impl PatternRule {
    /// Compile a case-insensitive rule
    pub fn new(pattern: &str, reply: impl Into<String>) -> Result<Self, ReplyRuleError> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ReplyRuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            pattern: compiled,
            reply: reply.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered, immutable rule list plus fallback
#[derive(Debug, Clone)]
pub struct ReplyMatcher {
    rules: Vec<PatternRule>,
    fallback: String,
}

impl ReplyMatcher {
    pub fn new(rules: Vec<PatternRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// The farming FAQ rules the portal ships with
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(pattern, reply)| PatternRule::new(pattern, *reply))
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in reply patterns are valid");
        Self::new(rules, FALLBACK_REPLY)
    }

    /// Reply for `text`: first matching rule in declaration order, else fallback
    pub fn reply_for(&self, text: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(PatternRule::reply)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ReplyMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str =
        "Weather: 5-day forecast integration planned. Meanwhile use the Weather service panel.";
    const DISEASE: &str = "Disease: Moisture + temperature + crop stage influence risk scoring.";
    const YIELD: &str =
        "Yield: Historical yield + soil chemistry + forecast alignment determine estimate bands.";
    const FERTILIZER: &str =
        "Fertilizer: Provide recent N-P-K and pH to refine balancing suggestions.";

    #[test]
    fn test_builtin_rules_compile_in_order() {
        let matcher = ReplyMatcher::builtin();
        let patterns: Vec<&str> = matcher.rules().iter().map(PatternRule::pattern).collect();
        assert_eq!(
            patterns,
            vec!["rain|weather", "fertilizer|nutrient", "disease|pest", "yield"]
        );
    }

    #[test]
    fn test_disease_question() {
        let matcher = ReplyMatcher::builtin();
        assert_eq!(matcher.reply_for("What about my disease risk?"), DISEASE);
    }

    #[test]
    fn test_rain_question() {
        let matcher = ReplyMatcher::builtin();
        assert_eq!(matcher.reply_for("How much rain this week?"), WEATHER);
    }

    #[test]
    fn test_unrelated_text_falls_back() {
        let matcher = ReplyMatcher::builtin();
        assert_eq!(matcher.reply_for("random unrelated text"), FALLBACK_REPLY);
    }

    #[test]
    fn test_yield_any_case() {
        let matcher = ReplyMatcher::builtin();
        for text in ["yield", "YIELD forecast?", "My Yield dropped", "expected yIeLd"] {
            assert_eq!(matcher.reply_for(text), YIELD, "input: {text}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let matcher = ReplyMatcher::builtin();
        assert_eq!(matcher.reply_for("Will rain hurt my yield?"), WEATHER);
        assert_eq!(matcher.reply_for("yield after pest attack"), DISEASE);
        assert_eq!(matcher.reply_for("nutrient plan before the weather turns"), WEATHER);
    }

    #[test]
    fn test_substring_match() {
        let matcher = ReplyMatcher::builtin();
        // "rainfall" contains "rain"
        assert_eq!(matcher.reply_for("rainfall prediction"), WEATHER);
        assert_eq!(matcher.reply_for("NUTRIENTS"), FERTILIZER);
    }

    #[test]
    fn test_custom_rules_and_fallback() {
        let rules = vec![
            PatternRule::new("^hello$", "hi there").unwrap(),
            PatternRule::new("soil", "soil reply").unwrap(),
        ];
        let matcher = ReplyMatcher::new(rules, "no idea");
        assert_eq!(matcher.fallback(), "no idea");
        assert_eq!(matcher.reply_for("HELLO"), "hi there");
        assert_eq!(matcher.reply_for("hello soil"), "soil reply");
        assert_eq!(matcher.reply_for("sand"), "no idea");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = PatternRule::new("(unclosed", "x").unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
