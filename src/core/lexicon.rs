// File: src/core/lexicon.rs
use crate::core::types::{Translations, Word, ENGLISH};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Words sharing one POS tag, in the order they were first inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PosBucket {
    words: Vec<Word>,
    /// Maps a base form to its slot in `words`.
    index: HashMap<String, usize>,
}

impl PosBucket {
    fn insert(&mut self, word: Word) {
        match self.index.get(&word.word) {
            Some(&slot) => self.words[slot] = word,
            None => {
                self.index.insert(word.word.clone(), self.words.len());
                self.words.push(word);
            }
        }
    }

    fn get(&self, word: &str) -> Option<&Word> {
        self.index.get(word).map(|&slot| &self.words[slot])
    }
}

/// Every known word grouped by POS tag:
/// { "ADJ" => { "blue" => {"French" => "bleu", ...}, ... }, "NOU" => { ... } }
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    buckets: BTreeMap<String, PosBucket>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a word under its POS tag. Re-adding an existing (POS, word)
    /// replaces its translations but keeps its position.
    pub fn add_word(&mut self, word: Word) {
        self.buckets.entry(word.pos.clone()).or_default().insert(word);
    }

    /// All words under `pos`, in insertion order.
    pub fn words(&self, pos: &str) -> Option<&[Word]> {
        self.buckets.get(pos).map(|bucket| bucket.words.as_slice())
    }

    pub fn get(&self, pos: &str, word: &str) -> Option<&Word> {
        self.buckets.get(pos)?.get(word)
    }

    pub fn translations(&self, pos: &str, word: &str) -> Option<&Translations> {
        self.get(pos, word).map(|w| &w.translations)
    }

    /// Words under `pos` that have a form in `language`. Every word
    /// qualifies for [`ENGLISH`]. Returns `None` when the tag is unknown.
    pub fn words_for_language(&self, language: &str, pos: &str) -> Option<Vec<&Word>> {
        let words = self.words(pos)?;
        let selected = if language == ENGLISH {
            words.iter().collect()
        } else {
            words
                .iter()
                .filter(|w| w.translations.contains_key(language))
                .collect()
        };
        Some(selected)
    }

    pub fn pos_tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Every language code that appears in some translation.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.words.iter())
            .flat_map(|w| w.translations.keys().map(String::as_str))
            .collect()
    }

    /// Number of (POS, word) entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(base: &str, pos: &str, pairs: &[(&str, &str)]) -> Word {
        let translations = pairs
            .iter()
            .map(|(l, w)| (l.to_string(), w.to_string()))
            .collect();
        Word::new(base, pos, translations)
    }

    #[test]
    fn readding_a_word_overwrites_in_place() {
        let mut lexicon = Lexicon::new();
        lexicon.add_word(word("blue", "ADJ", &[("French", "bleu")]));
        lexicon.add_word(word("red", "ADJ", &[("French", "rouge")]));
        lexicon.add_word(word("blue", "ADJ", &[("German", "blau")]));

        let bases: Vec<&str> = lexicon.words("ADJ").unwrap().iter().map(|w| w.word.as_str()).collect();
        assert_eq!(bases, ["blue", "red"]);

        let blue = lexicon.translations("ADJ", "blue").unwrap();
        assert_eq!(blue.get("German").map(String::as_str), Some("blau"));
        assert!(!blue.contains_key("French"));
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn same_base_form_under_two_tags_is_two_entries() {
        let mut lexicon = Lexicon::new();
        lexicon.add_word(word("fly", "NOU", &[("French", "mouche")]));
        lexicon.add_word(word("fly", "VER", &[("French", "voler")]));

        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.pos_tags().collect::<Vec<_>>(), ["NOU", "VER"]);
    }

    #[test]
    fn words_for_language_filters_untranslated_words() {
        let mut lexicon = Lexicon::new();
        lexicon.add_word(word("blue", "ADJ", &[("French", "bleu")]));
        lexicon.add_word(word("red", "ADJ", &[("German", "rot")]));

        let french: Vec<&str> = lexicon
            .words_for_language("French", "ADJ")
            .unwrap()
            .iter()
            .map(|w| w.word.as_str())
            .collect();
        assert_eq!(french, ["blue"]);
        assert_eq!(lexicon.words_for_language(ENGLISH, "ADJ").unwrap().len(), 2);
        assert_eq!(lexicon.words_for_language("Spanish", "ADJ").unwrap().len(), 0);
        assert!(lexicon.words_for_language(ENGLISH, "NOU").is_none());
        assert_eq!(lexicon.languages().into_iter().collect::<Vec<_>>(), ["French", "German"]);
    }
}
