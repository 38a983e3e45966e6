//! Years-of-experience extraction from resume text.
//!
//! This is a best-effort heuristic, not a precise extractor. The default
//! [`RegexExperienceParser`] takes the first integer directly followed by a
//! year unit (`year`, `years`, `yr`, `yrs`, any case, optional whitespace in
//! between). Known misses:
//!
//! - hyphenated or spelled-out forms: "5-year", "five years", "half a decade";
//! - the first mention wins even when it is not the total ("2 years at X,
//!   8 years overall" yields 2);
//! - date ranges ("2015 - 2020") are not interpreted.
//!
//! Anything that implements [`ExperienceParser`] can replace it in the
//! pipeline.

use regex::Regex;
use std::sync::LazyLock;

static YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:years|year|yrs|yr)").expect("years pattern is valid")
});

/// Extracts a candidate's years of experience from resume text.
pub trait ExperienceParser: Send + Sync {
    /// Short identifier shown in logs.
    fn name(&self) -> &str;

    /// Years of experience found in `text`; `0` when nothing is found.
    fn years(&self, text: &str) -> u32;
}

/// The default regex heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexExperienceParser;

impl ExperienceParser for RegexExperienceParser {
    fn name(&self) -> &str {
        "regex"
    }

    fn years(&self, text: &str) -> u32 {
        YEARS_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(text: &str) -> u32 {
        RegexExperienceParser.years(text)
    }

    #[test]
    fn parses_years_of_experience() {
        assert_eq!(years("5 years of experience"), 5);
    }

    #[test]
    fn no_number_is_zero() {
        assert_eq!(years("experienced professional"), 0);
        assert_eq!(years(""), 0);
    }

    #[test]
    fn abbreviated_units() {
        assert_eq!(years("3 yrs"), 3);
        assert_eq!(years("1 yr in retail"), 1);
    }

    #[test]
    fn case_and_spacing() {
        assert_eq!(years("Over 12 YEARS in finance"), 12);
        assert_eq!(years("7years"), 7);
        assert_eq!(years("4\nyears"), 4);
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(years("2 years at Initech, 8 years overall"), 2);
    }

    #[test]
    fn numbers_without_unit_are_ignored() {
        assert_eq!(years("Class of 2015, GPA 3.9, 10 yrs Python"), 10);
    }

    #[test]
    fn known_misses() {
        assert_eq!(years("a 5-year veteran"), 0);
        assert_eq!(years("five years"), 0);
    }

    #[test]
    fn overflow_is_zero() {
        assert_eq!(years("99999999999999999999 years"), 0);
    }
}
