// File: src/persistence.rs
use crate::core::engine::Translator;
use crate::core::grammar::Grammar;
use crate::core::lexicon::Lexicon;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// What gets written to disk: the parsed tables, not the source text.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    lexicon: &'a Lexicon,
    grammar: &'a Grammar,
}

#[derive(Deserialize)]
struct Snapshot {
    lexicon: Lexicon,
    grammar: Grammar,
}

/// Writes a bincode snapshot of `translator` to `path`, replacing the file
/// atomically.
pub fn save_snapshot(translator: &Translator, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SnapshotRef {
        lexicon: translator.lexicon(),
        grammar: translator.grammar(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &state)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    log::info!("Saved snapshot to '{}'", path.display());
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Translator> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: Snapshot = bincode::deserialize_from(reader)?;
    log::info!(
        "Loaded snapshot from '{}': {} words, {} rules",
        path.display(),
        state.lexicon.len(),
        state.grammar.len()
    );
    Ok(Translator::from_parts(state.lexicon, state.grammar))
}

/// Pretty JSON view of the loaded tables:
/// `{"lexicon": {POS: {word: {lang: form}}}, "grammar": {lang: [POS, ...]}}`.
pub fn export_json(translator: &Translator) -> Result<String> {
    let lexicon = translator.lexicon();
    let mut by_pos = Map::new();
    for pos in lexicon.pos_tags() {
        let mut words = Map::new();
        for word in lexicon.words(pos).unwrap_or_default() {
            words.insert(word.word.clone(), serde_json::to_value(&word.translations)?);
        }
        by_pos.insert(pos.to_string(), Value::Object(words));
    }

    let grammar: Map<String, Value> = translator
        .grammar()
        .rules()
        .map(|(language, tags)| (language.to_string(), json!(tags)))
        .collect();

    let document = json!({ "lexicon": by_pos, "grammar": grammar });
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn translator() -> Translator {
        let words = "the, DET, French:le\nblue, ADJ, French:bleu\ntruck, NOU, French:camion\n";
        let rules = "English: DET, ADJ, NOU\nFrench: DET, NOU, ADJ\n";
        Translator::from_readers(Cursor::new(words), "words", Cursor::new(rules), "rules").unwrap()
    }

    #[test]
    fn snapshot_restores_behaviour() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("translator.bin");

        save_snapshot(&translator(), &path).unwrap();
        let restored = load_snapshot(&path).unwrap();

        assert_eq!(restored.lexicon().len(), 3);
        assert_eq!(
            restored.translate("the blue truck", "English", "French").as_deref(),
            Some("le camion bleu")
        );
    }

    #[test]
    fn garbage_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");
        fs::write(&path, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();
        assert!(load_snapshot(&path).is_err());
    }

    #[test]
    fn json_export_lists_words_and_rules() {
        let text = export_json(&translator()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["lexicon"]["ADJ"]["blue"]["French"], "bleu");
        assert_eq!(value["grammar"]["French"], json!(["DET", "NOU", "ADJ"]));
    }
}
