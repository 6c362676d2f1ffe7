//! DOM extraction: lenient parse, cleanup, rule application, fallback.
//!
//! The parsed tree stays behind [`CleanDocument`]'s narrow surface — title
//! lookup, ordered rule application, whole-body fallback — so the rest of
//! the pipeline never touches selector or tree internals.

use scraper::ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

use crate::types::config::FragmentMode;
use crate::types::content::ExtractedContent;
use crate::types::rules::{ExtractionRule, RuleSet};

/// A leniently parsed document with non-content nodes already stripped.
pub struct CleanDocument {
    doc: Html,
}

impl CleanDocument {
    /// Parse raw HTML and strip non-content nodes.
    ///
    /// Parsing is browsers'-grade lenient and never fails; cleanup removes
    /// `<script>`/`<style>` subtrees, `style` attributes, and inline
    /// `data:` image sources before any rule runs.
    pub fn parse(html: &str) -> Self {
        let mut doc = Html::parse_document(html);
        strip_non_content(&mut doc);
        Self { doc }
    }

    /// Document title, trimmed; empty string when absent.
    pub fn title(&self) -> String {
        match Selector::parse("title") {
            Ok(selector) => self
                .doc
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// Apply the rule list in order, falling back to the whole body when
    /// the list is empty.
    ///
    /// Failed and zero-match rules are skipped, so the fragment list can
    /// come out shorter than the rule list — empty only when every rule
    /// was skipped, which callers treat as no usable content.
    pub fn extract(&mut self, rules: &RuleSet, fallback: FragmentMode) -> ExtractedContent {
        let title = self.title();

        if rules.is_empty() {
            return ExtractedContent::new(title, vec![self.body_fragment(fallback)]);
        }

        let mut fragments = Vec::new();
        for rule in rules.iter() {
            if !rule.is_usable() {
                debug!(rule_type = ?rule.rule_type, "skipping unsupported or empty rule");
                continue;
            }
            match self.apply_rule(rule) {
                Ok(Some(fragment)) => fragments.push(fragment),
                Ok(None) => debug!(selector = %rule.selector, "rule matched nothing, skipping"),
                Err(reason) => warn!(selector = %rule.selector, %reason, "rule failed, skipping"),
            }
        }
        ExtractedContent::new(title, fragments)
    }

    /// Run one CSS rule: select, prune exclusions, serialize.
    ///
    /// The joined inner HTML of every match becomes one fragment.
    fn apply_rule(&mut self, rule: &ExtractionRule) -> std::result::Result<Option<String>, String> {
        let selector = Selector::parse(&rule.selector).map_err(|err| err.to_string())?;
        let exclude = match rule.exclude.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(text) => Some(Selector::parse(text).map_err(|err| err.to_string())?),
            None => None,
        };

        let mut matched: Vec<NodeId> = Vec::new();
        let mut pruned: Vec<NodeId> = Vec::new();
        for element in self.doc.select(&selector) {
            matched.push(element.id());
            if let Some(exclude) = &exclude {
                pruned.extend(element.select(exclude).map(|el| el.id()));
            }
        }
        if matched.is_empty() {
            return Ok(None);
        }

        for id in pruned {
            if let Some(mut node) = self.doc.tree.get_mut(id) {
                node.detach();
            }
        }

        let mut parts = Vec::with_capacity(matched.len());
        for id in matched {
            if let Some(element) = self.doc.tree.get(id).and_then(ElementRef::wrap) {
                parts.push(element.inner_html());
            }
        }
        Ok(Some(parts.join("\n")))
    }

    /// The whole-body fallback fragment.
    fn body_fragment(&self, mode: FragmentMode) -> String {
        let body = Selector::parse("body")
            .ok()
            .and_then(|selector| self.doc.select(&selector).next());
        match (body, mode) {
            (Some(el), FragmentMode::InnerHtml) => el.inner_html(),
            (Some(el), FragmentMode::PlainText) => {
                el.text().collect::<String>().trim().to_string()
            }
            (None, _) => String::new(),
        }
    }
}

/// Pre-rule cleanup: script/style subtrees, style attributes, inline
/// image data.
fn strip_non_content(doc: &mut Html) {
    let mut drop_ids = Vec::new();
    for node in doc.tree.root().descendants() {
        if let Some(el) = node.value().as_element() {
            if matches!(el.name(), "script" | "style") {
                drop_ids.push(node.id());
            }
        }
    }
    for id in drop_ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let ids: Vec<NodeId> = doc.tree.root().descendants().map(|node| node.id()).collect();
    for id in ids {
        let Some(mut node) = doc.tree.get_mut(id) else {
            continue;
        };
        if let Node::Element(el) = node.value() {
            el.attrs.retain(|name, _| &*name.local != "style");
            if el.name() == "img" {
                for (name, value) in el.attrs.iter_mut() {
                    if &*name.local == "src" && value.starts_with("data:") {
                        *value = "".into();
                    }
                }
            }
        }
    }
}

/// Parse, clean, and extract in one step.
pub fn extract_content(html: &str, rules: &RuleSet, fallback: FragmentMode) -> ExtractedContent {
    let mut doc = CleanDocument::parse(html);
    doc.extract(rules, fallback)
}
