//! Tagged-variant dispatch and the extract-then-split preprocessing step.
//!
//! Everything variant-specific about a run is plain data selected by the
//! [`ModelVariant`] enum at the boundary — no writer hierarchies.

use tracing::debug;

use crate::chunk::split_into_chunks;
use crate::dom::CleanDocument;
use crate::error::{DistillError, Result};
use crate::types::config::{DistillConfig, FragmentMode};
use crate::types::job::ModelVariant;
use crate::types::rules::RuleSet;

/// The variant-specific capabilities of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStrategy {
    /// Model id sent to the generation service
    pub model: String,

    /// Fallback fragment representation
    pub fragment_mode: FragmentMode,

    /// Whether per-domain extraction rules are fetched and applied
    pub use_domain_rules: bool,
}

impl GenerationStrategy {
    /// Resolve the strategy for a variant from the library config.
    pub fn for_variant(variant: ModelVariant, config: &DistillConfig) -> Self {
        match variant {
            ModelVariant::RuleDriven => Self {
                model: config.primary_model.clone(),
                fragment_mode: FragmentMode::InnerHtml,
                use_domain_rules: true,
            },
            ModelVariant::FullText => Self {
                model: config.secondary_model.clone(),
                fragment_mode: FragmentMode::PlainText,
                use_domain_rules: false,
            },
        }
    }
}

/// Extract content and produce the chunk sequence for prompting.
///
/// Fragments become chunks as-is unless any single fragment exceeds
/// `max_chunk_size`; then the joined fragments are split once — never
/// both.
pub fn preprocess(
    html: &str,
    rules: &RuleSet,
    strategy: &GenerationStrategy,
    max_chunk_size: usize,
) -> Result<(String, Vec<String>)> {
    let mut doc = CleanDocument::parse(html);
    let content = doc.extract(rules, strategy.fragment_mode);

    if content.is_empty() {
        return Err(DistillError::NoUsableContent);
    }

    let title = content.title;
    let fragments = content.fragments;

    let chunks = if fragments.iter().any(|f| f.chars().count() > max_chunk_size) {
        let joined = fragments.join("\n\n");
        debug!(
            fragments = fragments.len(),
            joined_chars = joined.chars().count(),
            max_chunk_size,
            "fragment over the limit, splitting joined fragments"
        );
        split_into_chunks(&joined, max_chunk_size)?
    } else {
        fragments
    };

    Ok((title, chunks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rules::ExtractionRule;

    const PAGE: &str = r#"<html><head><title>T</title></head>
        <body><div id="main"><p>short content</p></div></body></html>"#;

    #[test]
    fn variants_map_to_models_and_modes() {
        let config = DistillConfig::default();

        let rule_driven = GenerationStrategy::for_variant(ModelVariant::RuleDriven, &config);
        assert_eq!(rule_driven.model, config.primary_model);
        assert_eq!(rule_driven.fragment_mode, FragmentMode::InnerHtml);
        assert!(rule_driven.use_domain_rules);

        let full_text = GenerationStrategy::for_variant(ModelVariant::FullText, &config);
        assert_eq!(full_text.model, config.secondary_model);
        assert_eq!(full_text.fragment_mode, FragmentMode::PlainText);
        assert!(!full_text.use_domain_rules);
    }

    #[test]
    fn small_fragments_pass_through_unsplit() {
        let config = DistillConfig::default();
        let strategy = GenerationStrategy::for_variant(ModelVariant::RuleDriven, &config);
        let rules = RuleSet::new(vec![ExtractionRule::css("#main")]);

        let (title, chunks) = preprocess(PAGE, &rules, &strategy, 8_000).unwrap();
        assert_eq!(title, "T");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("short content"));
    }

    #[test]
    fn an_oversized_fragment_triggers_one_split() {
        let config = DistillConfig::default();
        let strategy = GenerationStrategy::for_variant(ModelVariant::FullText, &config);
        let body = "word ".repeat(200);
        let html = format!("<html><head><title>T</title></head><body><p>{body}</p></body></html>");

        let (_, chunks) = preprocess(&html, &RuleSet::empty(), &strategy, 100).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn rules_matching_nothing_is_no_usable_content() {
        let config = DistillConfig::default();
        let strategy = GenerationStrategy::for_variant(ModelVariant::RuleDriven, &config);
        let rules = RuleSet::new(vec![ExtractionRule::css("#missing")]);

        let err = preprocess(PAGE, &rules, &strategy, 8_000).unwrap_err();
        assert!(matches!(err, DistillError::NoUsableContent));
    }
}
