// file: src/extractor/patterns.rs
// description: ordered full-match pattern registry for freeform indicator classification
// reference: https://docs.rs/regex

use crate::config::PatternConfig;
use crate::error::{PipelineError, Result};
use crate::models::IndicatorType;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct PatternRegistry {
    matchers: Vec<(IndicatorType, Regex)>,
}

impl PatternRegistry {
    /// Compiles one anchored matcher per indicator type, in priority order.
    pub fn from_config(patterns: &PatternConfig) -> Result<Self> {
        let mut matchers = Vec::with_capacity(IndicatorType::PRIORITY.len());

        for indicator_type in IndicatorType::PRIORITY {
            let pattern = patterns.pattern_for(indicator_type);
            if pattern.trim().is_empty() {
                return Err(PipelineError::Config(format!(
                    "missing pattern for {}",
                    indicator_type
                )));
            }
            matchers.push((indicator_type, compile_full_match(indicator_type, pattern)?));
        }

        Ok(Self { matchers })
    }

    /// Type of the first matcher that accepts the whole of `value`.
    pub fn classify(&self, value: &str) -> Option<IndicatorType> {
        self.matchers
            .iter()
            .find(|(_, regex)| regex.is_match(value))
            .map(|(indicator_type, _)| *indicator_type)
    }

    pub fn matches(&self, indicator_type: IndicatorType, value: &str) -> bool {
        self.matchers
            .iter()
            .any(|(t, regex)| *t == indicator_type && regex.is_match(value))
    }

    pub fn order(&self) -> impl Iterator<Item = IndicatorType> + '_ {
        self.matchers.iter().map(|(t, _)| *t)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::from_config(&PatternConfig::default())
            .expect("built-in indicator patterns are valid")
    }
}

fn compile_full_match(indicator_type: IndicatorType, pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{})\z", pattern)).map_err(|e| {
        PipelineError::Config(format!("invalid {} pattern: {}", indicator_type, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_priority_order() {
        let registry = PatternRegistry::default();
        let order: Vec<_> = registry.order().collect();
        assert_eq!(order, IndicatorType::PRIORITY.to_vec());
    }

    #[test]
    fn test_hash_lengths() {
        let registry = PatternRegistry::default();

        assert_eq!(
            registry.classify("d41d8cd98f00b204e9800998ecf8427e"),
            Some(IndicatorType::Md5)
        );
        assert_eq!(
            registry.classify("da39a3ee5e6b4b0d3255bfef95601890afd80709"),
            Some(IndicatorType::Sha1)
        );
        assert_eq!(
            registry.classify("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
            Some(IndicatorType::Sha256)
        );
    }

    #[test]
    fn test_full_match_only() {
        let registry = PatternRegistry::default();

        // 33 hex chars is not an MD5, and not anything else either
        assert_eq!(registry.classify("d41d8cd98f00b204e9800998ecf8427e0"), None);
        assert!(!registry.matches(IndicatorType::Ipv4, "x203.0.113.5"));
    }

    #[test]
    fn test_ipv4_range_validation() {
        let registry = PatternRegistry::default();

        assert_eq!(registry.classify("8.8.8.8"), Some(IndicatorType::Ipv4));
        assert_eq!(registry.classify("255.255.255.255"), Some(IndicatorType::Ipv4));
        assert!(!registry.matches(IndicatorType::Ipv4, "256.1.1.1"));
    }

    #[test]
    fn test_ipv6_forms() {
        let registry = PatternRegistry::default();

        for value in [
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334",
            "2001:db8::1",
            "::1",
            "fe80::",
        ] {
            assert_eq!(registry.classify(value), Some(IndicatorType::Ipv6), "{}", value);
        }
    }

    #[test]
    fn test_email_url_domain() {
        let registry = PatternRegistry::default();

        assert_eq!(
            registry.classify("phish@evil.example.net"),
            Some(IndicatorType::Email)
        );
        assert_eq!(
            registry.classify("http://evil.example.net/payload.exe"),
            Some(IndicatorType::Url)
        );
        assert_eq!(
            registry.classify("evil.example.net"),
            Some(IndicatorType::Domain)
        );
        assert_eq!(registry.classify("not-an-ioc!!"), None);
    }

    #[test]
    fn test_first_match_wins_for_overlapping_patterns() {
        let mut patterns = PatternConfig::default();
        // a domain pattern broad enough to swallow hex strings
        patterns.domain = r"[a-z0-9.]+".to_string();
        let registry = PatternRegistry::from_config(&patterns).unwrap();

        assert_eq!(
            registry.classify("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
            Some(IndicatorType::Sha256)
        );
        assert_eq!(registry.classify("abc"), Some(IndicatorType::Domain));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let mut patterns = PatternConfig::default();
        patterns.url = "http://a|b".to_string();
        let registry = PatternRegistry::from_config(&patterns).unwrap();

        assert!(!registry.matches(IndicatorType::Url, "http://abc"));
        assert!(registry.matches(IndicatorType::Url, "b"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut patterns = PatternConfig::default();
        patterns.md5 = "[unclosed".to_string();

        let err = PatternRegistry::from_config(&patterns).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("MD5"));
    }
}
