// File: src/core/loader.rs
//! Line parsers for the two flat source formats.
//!
//! Lexicon lines look like `blue, ADJ, French:bleu, German:blau` and grammar
//! lines like `French: DET, NOU, ADJ{2}`. A line that does not fit its format
//! is dropped and counted, never reported as an error.

use crate::core::grammar::Grammar;
use crate::core::lexicon::Lexicon;
use crate::core::types::{Translations, Word};
use crate::error::Result;
use regex::Regex;
use std::io::BufRead;
use std::sync::LazyLock;

static LEXICON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z-]+),\s([A-Z]{3}),\s(.*)").unwrap());
static TRANSLATION_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-z0-9]*:[a-z-]+(, )?)+$").unwrap());
static TRANSLATION_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z0-9]*):([a-z-]+)").unwrap());

static GRAMMAR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-z0-9]*):\s(.*)").unwrap());
static TAG_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{3}(\{[0-9]+\})?(, )?)+$").unwrap());
static TAG_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{3})(?:\{([0-9]+)\})?").unwrap());

/// Line counts from loading one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Name used in log lines, usually the file path.
    pub source: String,
    pub lines: usize,
    pub accepted: usize,
    pub skipped: usize,
}

impl LoadReport {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }
}

/// Parses `word, POS, Lang:word, Lang:word, ...` into a [`Word`].
pub fn parse_lexicon_line(line: &str) -> Option<Word> {
    let caps = LEXICON_LINE.captures(line.trim())?;
    let list = caps[3].trim();
    if !TRANSLATION_LIST.is_match(list) {
        return None;
    }

    // Later pairs for the same language win.
    let translations: Translations = TRANSLATION_PAIR
        .captures_iter(list)
        .map(|pair| (pair[1].to_string(), pair[2].to_string()))
        .collect();

    Some(Word::new(&caps[1], &caps[2], translations))
}

/// Parses `Lang: POS, POS{N}, ...` into the language and its expanded tag
/// sequence. `TAG{N}` becomes N copies of TAG; a count that does not fit in
/// `usize`, or whose expansion cannot be allocated, rejects the line.
pub fn parse_grammar_line(line: &str) -> Option<(String, Vec<String>)> {
    let caps = GRAMMAR_LINE.captures(line.trim())?;
    let list = &caps[2];
    if !TAG_LIST.is_match(list) {
        return None;
    }

    let mut tags = Vec::new();
    for entry in TAG_ENTRY.captures_iter(list) {
        let tag = &entry[1];
        let count = match entry.get(2) {
            Some(n) => n.as_str().parse::<usize>().ok()?,
            None => 1,
        };
        tags.try_reserve(count).ok()?;
        tags.extend(std::iter::repeat(tag.to_string()).take(count));
    }

    Some((caps[1].to_string(), tags))
}

/// Reads lexicon lines from `reader` into `lexicon`.
pub fn load_lexicon<R: BufRead>(lexicon: &mut Lexicon, reader: R, source: &str) -> Result<LoadReport> {
    let mut report = LoadReport::new(source);
    for (n, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        report.lines += 1;
        match std::str::from_utf8(&raw).ok().and_then(parse_lexicon_line) {
            Some(word) => {
                lexicon.add_word(word);
                report.accepted += 1;
            }
            None => {
                log::debug!(
                    "{}:{}: skipping malformed lexicon line {:?}",
                    source,
                    n + 1,
                    String::from_utf8_lossy(&raw)
                );
                report.skipped += 1;
            }
        }
    }
    log::info!(
        "Loaded lexicon from '{}': {} accepted, {} skipped",
        source,
        report.accepted,
        report.skipped
    );
    Ok(report)
}

/// Reads grammar lines from `reader` into `grammar`.
pub fn load_grammar<R: BufRead>(grammar: &mut Grammar, reader: R, source: &str) -> Result<LoadReport> {
    let mut report = LoadReport::new(source);
    for (n, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        report.lines += 1;
        match std::str::from_utf8(&raw).ok().and_then(parse_grammar_line) {
            Some((language, tags)) => {
                grammar.add_rule(language, tags);
                report.accepted += 1;
            }
            None => {
                log::debug!(
                    "{}:{}: skipping malformed grammar line {:?}",
                    source,
                    n + 1,
                    String::from_utf8_lossy(&raw)
                );
                report.skipped += 1;
            }
        }
    }
    log::info!(
        "Loaded grammar from '{}': {} accepted, {} skipped",
        source,
        report.accepted,
        report.skipped
    );
    Ok(report)
}
