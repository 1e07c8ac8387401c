use crate::core::grammar::Grammar;
use crate::core::lexicon::Lexicon;
use crate::core::loader::{load_grammar, load_lexicon, LoadReport};
use crate::core::types::{StructureRef, Word, ENGLISH};
use crate::error::{Result, TranslatorError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A lexicon and a grammar loaded once, then only read.
///
/// Every sentence operation either succeeds completely or reports failure
/// through `None` (or `false` for [`Translator::check_grammar`]).
#[derive(Debug, Clone, Default)]
pub struct Translator {
    lexicon: Lexicon,
    grammar: Grammar,
    lexicon_report: LoadReport,
    grammar_report: LoadReport,
}

impl Translator {
    /// Loads the lexicon and grammar source files.
    pub fn from_files(lexicon_path: impl AsRef<Path>, grammar_path: impl AsRef<Path>) -> Result<Self> {
        let lexicon_path = lexicon_path.as_ref();
        let grammar_path = grammar_path.as_ref();
        Self::from_readers(
            open_source(lexicon_path)?,
            &lexicon_path.display().to_string(),
            open_source(grammar_path)?,
            &grammar_path.display().to_string(),
        )
    }

    /// Loads from any two line-oriented readers; the names only show up in
    /// logs and load reports.
    pub fn from_readers<L, G>(lexicon_src: L, lexicon_name: &str, grammar_src: G, grammar_name: &str) -> Result<Self>
    where
        L: BufRead,
        G: BufRead,
    {
        let mut lexicon = Lexicon::new();
        let mut grammar = Grammar::new();
        let lexicon_report = load_lexicon(&mut lexicon, lexicon_src, lexicon_name)?;
        let grammar_report = load_grammar(&mut grammar, grammar_src, grammar_name)?;
        Ok(Self {
            lexicon,
            grammar,
            lexicon_report,
            grammar_report,
        })
    }

    /// Wraps an already built lexicon and grammar.
    pub fn from_parts(lexicon: Lexicon, grammar: Grammar) -> Self {
        Self {
            lexicon,
            grammar,
            ..Self::default()
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn lexicon_report(&self) -> &LoadReport {
        &self.lexicon_report
    }

    pub fn grammar_report(&self) -> &LoadReport {
        &self.grammar_report
    }

    /// Builds a random sentence in `language` following `structure`.
    pub fn generate_sentence(&self, language: &str, structure: &StructureRef) -> Option<String> {
        self.generate_sentence_with_rng(language, structure, &mut rand::thread_rng())
    }

    /// Same as [`Translator::generate_sentence`], drawing words from `rng`.
    pub fn generate_sentence_with_rng<R: Rng + ?Sized>(
        &self,
        language: &str,
        structure: &StructureRef,
        rng: &mut R,
    ) -> Option<String> {
        let rule = self.grammar.resolve(structure)?;

        let mut sentence = Vec::with_capacity(rule.len());
        for pos in rule {
            let candidates: Vec<&str> = self
                .lexicon
                .words_for_language(language, pos)?
                .into_iter()
                .filter_map(|w| w.form_in(language))
                .collect();

            match candidates.choose(rng) {
                Some(form) => sentence.push(*form),
                None => {
                    log::debug!("generate: no {} word has a {} form", pos, language);
                    return None;
                }
            }
        }
        Some(join_tokens(&sentence))
    }

    /// True when each tag of `language`'s rule is matched, in order, by the
    /// next token of `sentence`: either a base form under that tag or that
    /// tag's translation into `language`. Tokens beyond the rule are not
    /// inspected; a sentence shorter than the rule fails.
    pub fn check_grammar(&self, sentence: &str, language: &str) -> bool {
        let Some(rule) = self.grammar.rule(language) else {
            return false;
        };
        let tokens: Vec<&str> = sentence.split_whitespace().collect();

        for (i, pos) in rule.iter().enumerate() {
            let Some(words) = self.lexicon.words(pos) else {
                return false;
            };
            let matched = tokens.get(i).is_some_and(|token| {
                self.lexicon.get(pos, token).is_some()
                    || words
                        .iter()
                        .any(|w| w.translations.get(language).is_some_and(|t| t == token))
            });
            if !matched {
                log::trace!("check: token {} does not fit {}", i, pos);
                return false;
            }
        }
        true
    }

    /// Re-orders the tokens of `sentence` from structure `from` into
    /// structure `to`.
    ///
    /// Tokens are paired with `from`'s tags by position. Each tag of `to`
    /// then takes the earliest unused token paired with that tag, so repeated
    /// tags keep their relative order. Both structures must use the same
    /// distinct tags; how often each appears is not compared.
    pub fn change_grammar(&self, sentence: &str, from: &StructureRef, to: &StructureRef) -> Option<String> {
        let rule1 = self.grammar.resolve(from)?;
        let rule2 = self.grammar.resolve(to)?;

        let tags1: HashSet<&str> = rule1.iter().map(String::as_str).collect();
        let tags2: HashSet<&str> = rule2.iter().map(String::as_str).collect();
        if tags1 != tags2 {
            log::debug!("reorder: structures use different tags");
            return None;
        }

        // A tag past the end of the sentence pairs with no token.
        let mut tokens = sentence.split_whitespace();
        let pairs: Vec<(&str, Option<&str>)> = rule1.iter().map(|tag| (tag.as_str(), tokens.next())).collect();
        let mut used = vec![false; pairs.len()];

        let mut reordered = Vec::with_capacity(rule2.len());
        for tag in rule2 {
            let slot = (0..pairs.len()).find(|&i| !used[i] && pairs[i].0 == tag.as_str());
            let Some(slot) = slot else {
                log::debug!("reorder: no {} left to place", tag);
                return None;
            };
            used[slot] = true;
            if let Some(token) = pairs[slot].1 {
                reordered.push(token);
            }
        }
        Some(join_tokens(&reordered))
    }

    /// Replaces every token of `sentence` with its counterpart in `target`,
    /// keeping word order. Tokens are matched positionally against the tags
    /// of `source`'s grammar rule; `target` must also have a rule.
    pub fn change_language(&self, sentence: &str, source: &str, target: &str) -> Option<String> {
        let rule1 = self.grammar.rule(source)?;
        self.grammar.rule(target)?;

        let mut tokens = sentence.split_whitespace();
        let mut changed = Vec::with_capacity(rule1.len());
        for pos in rule1 {
            let words = self.lexicon.words(pos)?;
            let token = tokens.next();
            let substitute = token.and_then(|token| substitute(words, token, source, target));
            match substitute {
                Some(form) => changed.push(form),
                None => {
                    log::debug!("substitute: no {} word maps {:?} from {} to {}", pos, token, source, target);
                    return None;
                }
            }
        }
        Some(join_tokens(&changed))
    }

    /// Translates `sentence` from `source` to `target`: words are substituted
    /// first, then re-ordered from `source`'s structure into `target`'s.
    pub fn translate(&self, sentence: &str, source: &str, target: &str) -> Option<String> {
        let substituted = self.change_language(sentence, source, target)?;
        self.change_grammar(&substituted, &StructureRef::named(source), &StructureRef::named(target))
    }
}

/// The first word under one tag whose `source` form is `token`, mapped to its
/// non-empty `target` form.
fn substitute<'a>(words: &'a [Word], token: &str, source: &str, target: &str) -> Option<&'a str> {
    if source == ENGLISH {
        words
            .iter()
            .find(|w| w.word == token && w.translations.contains_key(target))
            .and_then(|w| non_empty(&w.translations[target]))
    } else if target == ENGLISH {
        words
            .iter()
            .find(|w| w.translations.get(source).is_some_and(|t| t == token))
            .map(|w| w.word.as_str())
    } else {
        words
            .iter()
            .find(|w| {
                w.translations.contains_key(target)
                    && w.translations.get(source).is_some_and(|t| t == token)
            })
            .and_then(|w| non_empty(&w.translations[target]))
    }
}

fn non_empty(form: &str) -> Option<&str> {
    (!form.is_empty()).then_some(form)
}

fn join_tokens(tokens: &[&str]) -> String {
    tokens.join(" ").trim().to_string()
}

fn open_source(path: &Path) -> Result<BufReader<File>> {
    if path.is_dir() {
        return Err(TranslatorError::PathIsDirectory(path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(path)?))
}
