// File: src/core/grammar.rs
use crate::core::types::StructureRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentence word order per language:
/// { "English" => ["DET", "ADJ", "NOU"], "French" => ["DET", "NOU", "ADJ"] }
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grammar {
    rules: BTreeMap<String, Vec<String>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the rule for `language`, replacing any earlier one.
    pub fn add_rule(&mut self, language: impl Into<String>, tags: Vec<String>) {
        self.rules.insert(language.into(), tags);
    }

    pub fn rule(&self, language: &str) -> Option<&[String]> {
        self.rules.get(language).map(Vec::as_slice)
    }

    /// Looks up a named structure, or hands back an explicit one as is.
    pub fn resolve<'a>(&'a self, structure: &'a StructureRef) -> Option<&'a [String]> {
        match structure {
            StructureRef::Named(language) => self.rule(language),
            StructureRef::Explicit(tags) => Some(tags),
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules.iter().map(|(l, r)| (l.as_str(), r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn later_rule_replaces_earlier() {
        let mut grammar = Grammar::new();
        grammar.add_rule("French", tags(&["DET", "ADJ", "NOU"]));
        grammar.add_rule("French", tags(&["DET", "NOU", "ADJ"]));

        assert_eq!(grammar.rule("French").unwrap(), tags(&["DET", "NOU", "ADJ"]).as_slice());
        assert_eq!(grammar.len(), 1);
    }

    #[test]
    fn resolve_named_and_explicit() {
        let mut grammar = Grammar::new();
        grammar.add_rule("English", tags(&["DET", "NOU"]));

        let named = StructureRef::named("English");
        let explicit = StructureRef::explicit(["NOU", "NOU"]);
        let unknown = StructureRef::named("Klingon");

        assert_eq!(grammar.resolve(&named).unwrap(), tags(&["DET", "NOU"]).as_slice());
        assert_eq!(grammar.resolve(&explicit).unwrap(), tags(&["NOU", "NOU"]).as_slice());
        assert!(grammar.resolve(&unknown).is_none());
    }
}
