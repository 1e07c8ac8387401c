use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use log::{LevelFilter, Log, Metadata, Record};
use std::env;
use std::fs::File;
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use translator_core::persistence::{export_json, load_snapshot, save_snapshot};
use translator_core::{StructureRef, Translator};

const LEXICON_PATH: &str = "lexicon.txt";
const GRAMMAR_PATH: &str = "grammar.txt";
const LOG_PATH: &str = "target/translator.log";
const USAGE: &str = "usage: translator [LEXICON] [GRAMMAR] [--snapshot PATH]";

const HELP: &str = "\
Commands:
  gen <Lang> <Struct>              random sentence, Struct is a language or DET,ADJ,NOU
  check <Lang> <sentence>          grammar check against Lang's rule
  reorder <S1> <S2> <sentence>     move words from structure S1 into S2
  lang <L1> <L2> <sentence>        word-for-word substitution
  translate <L1> <L2> <sentence>   substitution followed by reordering
  rules | json | clear | help | exit";

/// Appends every record to a log file.
struct FileLogger {
    level: LevelFilter,
    path: PathBuf,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = File::options().create(true).append(true).open(&self.path) {
            let _ = writeln!(file, "[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    let level = env::var("TRANSLATOR_LOG")
        .ok()
        .and_then(|l| LevelFilter::from_str(&l).ok())
        .unwrap_or(LevelFilter::Info);
    let path = env::var_os("TRANSLATOR_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(LOG_PATH));
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    // Start every session with an empty log.
    let _ = std::fs::remove_file(&path);

    let logger: &'static FileLogger = Box::leak(Box::new(FileLogger { level, path }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

struct Args {
    lexicon: PathBuf,
    grammar: PathBuf,
    snapshot: Option<PathBuf>,
}

/// Returns `Ok(None)` when help was asked for.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<Args>, String> {
    let mut positional = Vec::new();
    let mut snapshot = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--snapshot" => {
                let path = args.next().ok_or("--snapshot needs a path")?;
                snapshot = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    if positional.len() > 2 {
        return Err(format!("unexpected argument '{}'", positional[2].display()));
    }
    let mut positional = positional.into_iter();
    Ok(Some(Args {
        lexicon: positional.next().unwrap_or_else(|| PathBuf::from(LEXICON_PATH)),
        grammar: positional.next().unwrap_or_else(|| PathBuf::from(GRAMMAR_PATH)),
        snapshot,
    }))
}

fn load(args: &Args) -> translator_core::Result<Translator> {
    if let Some(path) = args.snapshot.as_deref().filter(|p| p.exists()) {
        match load_snapshot(path) {
            Ok(translator) => return Ok(translator),
            Err(e) => log::warn!("Ignoring unreadable snapshot '{}': {}", path.display(), e),
        }
    }
    Translator::from_files(&args.lexicon, &args.grammar)
}

fn main() {
    init_logging();

    let args = match parse_args(env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        }
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    let translator = match load(&args) {
        Ok(translator) => translator,
        Err(e) => {
            eprintln!("[ERROR] Could not load translator: {}", e);
            std::process::exit(1);
        }
    };

    println!("POS Translator. Type 'help' for commands, 'exit' to quit.");
    println!("---------------------------------------------------------------");
    print_summary(&translator);

    loop {
        print!("\n> ");
        let _ = stdout().flush();

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("[ERROR] Could not read input: {}", e);
                break;
            }
        }
        let line = input.trim();
        let (cmd, rest) = next_word(line);
        log::debug!("command {:?}", line);

        match cmd {
            "exit" | "quit" => break,
            "" => {}
            "help" => println!("{}", HELP),
            "clear" => {
                let _ = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0));
            }
            "rules" => {
                for (language, tags) in translator.grammar().rules() {
                    println!("  {}: {}", language.bold(), tags.join(", "));
                }
            }
            "json" => match export_json(&translator) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("[ERROR] {}", e),
            },
            "gen" => {
                let (language, rest) = next_word(rest);
                let (structure, _) = next_word(rest);
                print_outcome(translator.generate_sentence(language, &parse_structure(structure)));
            }
            "check" => {
                let (language, sentence) = next_word(rest);
                if translator.check_grammar(sentence, language) {
                    println!("{}", "valid".green());
                } else {
                    println!("{}", "invalid".red());
                }
            }
            "reorder" => {
                let (from, rest) = next_word(rest);
                let (to, sentence) = next_word(rest);
                print_outcome(translator.change_grammar(sentence, &parse_structure(from), &parse_structure(to)));
            }
            "lang" => {
                let (source, rest) = next_word(rest);
                let (target, sentence) = next_word(rest);
                print_outcome(translator.change_language(sentence, source, target));
            }
            "translate" => {
                let (source, rest) = next_word(rest);
                let (target, sentence) = next_word(rest);
                print_outcome(translator.translate(sentence, source, target));
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    if let Some(path) = &args.snapshot {
        save(&translator, path);
    }
}

fn save(translator: &Translator, path: &Path) {
    println!("\nSaving snapshot...");
    if let Err(e) = save_snapshot(translator, path) {
        eprintln!("[ERROR] Could not save snapshot: {}", e);
    } else {
        println!("Snapshot saved to '{}'", path.display());
    }
}

fn print_summary(translator: &Translator) {
    let lexicon = translator.lexicon();
    println!(
        "{} words under {} tags, {} grammar rules",
        lexicon.len(),
        lexicon.pos_tags().count(),
        translator.grammar().len()
    );
    for report in [translator.lexicon_report(), translator.grammar_report()] {
        if report.skipped > 0 {
            println!(
                "{}",
                format!("Skipped {} malformed line(s) in '{}'", report.skipped, report.source).yellow()
            );
        }
    }
}

fn print_outcome(result: Option<String>) {
    match result {
        Some(sentence) => println!("{}", sentence.green()),
        None => println!("{}", "failed".red()),
    }
}

/// Splits off the first whitespace-separated word.
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

/// `DET,ADJ,NOU` is an explicit tag sequence; anything else names a language.
fn parse_structure(arg: &str) -> StructureRef {
    let is_tag = |t: &str| t.len() == 3 && t.bytes().all(|b| b.is_ascii_uppercase());
    if !arg.is_empty() && arg.split(',').all(is_tag) {
        StructureRef::explicit(arg.split(','))
    } else {
        StructureRef::named(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_argument_forms() {
        assert_eq!(parse_structure("French"), StructureRef::named("French"));
        assert_eq!(parse_structure("NOU"), StructureRef::explicit(["NOU"]));
        assert_eq!(parse_structure("DET,ADJ,NOU"), StructureRef::explicit(["DET", "ADJ", "NOU"]));
        assert_eq!(parse_structure("DET,Adj"), StructureRef::named("DET,Adj"));
    }

    fn args(list: &[&str]) -> Result<Option<Args>, String> {
        parse_args(list.iter().map(|a| a.to_string()))
    }

    #[test]
    fn help_flag_is_not_an_error() {
        assert!(matches!(args(&["--help"]), Ok(None)));
        assert!(matches!(args(&["words.txt", "-h"]), Ok(None)));
    }

    #[test]
    fn positional_paths_and_snapshot() {
        let parsed = args(&["w.txt", "--snapshot", "t.bin", "g.txt"]).unwrap().unwrap();
        assert_eq!(parsed.lexicon, PathBuf::from("w.txt"));
        assert_eq!(parsed.grammar, PathBuf::from("g.txt"));
        assert_eq!(parsed.snapshot, Some(PathBuf::from("t.bin")));

        let defaults = args(&[]).unwrap().unwrap();
        assert_eq!(defaults.lexicon, PathBuf::from(LEXICON_PATH));
        assert!(defaults.snapshot.is_none());

        assert!(args(&["a", "b", "c"]).is_err());
        assert!(args(&["--snapshot"]).is_err());
    }

    #[test]
    fn next_word_splits_once() {
        assert_eq!(next_word("  translate English  French the blue"), ("translate", "English  French the blue"));
        assert_eq!(next_word("exit"), ("exit", ""));
        assert_eq!(next_word(""), ("", ""));
    }
}
