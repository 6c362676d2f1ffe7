//! Extraction rules — domain-scoped instructions selecting page content.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DistillError, Result};

/// Kind of extraction rule.
///
/// Kinds this build does not understand deserialize to [`RuleType::Unknown`]
/// and are skipped during extraction rather than failing the rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// CSS selector over the parsed document
    Css,
    /// Anything else
    #[serde(other)]
    Unknown,
}

/// One extraction rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Rule kind
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Selector choosing the content subtree(s)
    pub selector: String,

    /// Optional selector pruning descendants from the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl ExtractionRule {
    /// Create a CSS rule.
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            rule_type: RuleType::Css,
            selector: selector.into(),
            exclude: None,
        }
    }

    /// Set the exclusion selector.
    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// A rule is usable when its kind is known and the selector is non-empty.
    pub fn is_usable(&self) -> bool {
        self.rule_type == RuleType::Css && !self.selector.trim().is_empty()
    }
}

/// Ordered rule list for one domain.
///
/// A read-only snapshot parsed from the rule store once per run; rule
/// order determines output fragment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet(Vec<ExtractionRule>);

impl RuleSet {
    /// Wrap an ordered rule list.
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self(rules)
    }

    /// The empty rule set (whole-body fallback applies).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the serialized rule list fetched from the rule store.
    pub fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let rules: Vec<ExtractionRule> = serde_json::from_str(text)?;
        Ok(Self(rules))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtractionRule> {
        self.0.iter()
    }
}

/// Rule store key for a URL's host: `domain:<host>` with the host
/// lowercased and a leading `www.` stripped.
pub fn domain_key(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| DistillError::Config(format!("URL has no host: {url}")))?
        .to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    Ok(format!("domain:{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_with_unknown_types() {
        let rules = RuleSet::parse(
            r#"[
                {"type": "css", "selector": "#main", "exclude": ".ads"},
                {"type": "xpath", "selector": "//div"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        let parsed: Vec<_> = rules.iter().collect();
        assert_eq!(parsed[0].rule_type, RuleType::Css);
        assert_eq!(parsed[0].exclude.as_deref(), Some(".ads"));
        assert_eq!(parsed[1].rule_type, RuleType::Unknown);
        assert!(!parsed[1].is_usable());
    }

    #[test]
    fn empty_selector_is_not_usable() {
        assert!(!ExtractionRule::css("  ").is_usable());
        assert!(ExtractionRule::css("#main").is_usable());
    }

    #[test]
    fn rejects_malformed_rule_text() {
        assert!(RuleSet::parse("not json").is_err());
    }

    #[test]
    fn domain_key_normalizes_the_host() {
        assert_eq!(
            domain_key("https://WWW.Example.ORG/news/1").unwrap(),
            "domain:example.org"
        );
        assert_eq!(
            domain_key("https://blog.example.org").unwrap(),
            "domain:blog.example.org"
        );
    }

    #[test]
    fn domain_key_requires_a_host() {
        assert!(domain_key("not a url").is_err());
        assert!(domain_key("mailto:someone@example.org").is_err());
    }
}
