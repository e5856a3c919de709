//! Command parsing for the grammar workbench

use std::path::PathBuf;

/// A parsed workbench command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add terminal symbols
    Terminals(Vec<String>),
    /// Add nonterminal symbols
    Nonterminals(Vec<String>),
    /// Remove terminal symbols
    RemoveTerminals(Vec<String>),
    /// Remove nonterminal symbols
    RemoveNonterminals(Vec<String>),
    /// Choose the axiom
    Axiom(String),
    /// Add the rules of a `A->b|c` line
    Rule(String),
    /// Remove a single `A->b` rule
    Unrule(String),
    /// Set the expansion depth
    Levels(String),
    /// Replace the word under test
    Word(String),
    /// Submit the grammar and draw its derivation tree
    Tree,
    /// Print the grammar
    Show,
    /// List rules broken by alphabet edits
    Check,
    /// Delete rules broken by alphabet edits
    Prune,
    /// Generate random words locally
    Sample(usize),
    /// Save the grammar as JSON
    Save(PathBuf),
    /// Load a grammar from JSON
    Load(PathBuf),
    Help,
    Quit,
    /// Blank line or comment
    Empty,
    /// Unknown command or bad arguments
    Unknown(String),
}

pub const HELP: &str = "\
t SYM..          add terminal symbols
n SYM..          add nonterminal symbols
rt SYM..         remove terminal symbols
rn SYM..         remove nonterminal symbols
axiom SYM        choose the axiom
rule A->b|c      add production rules
unrule A->b      remove a production rule
levels N         set the expansion depth
word [WORD]      test a word (no argument clears it)
tree             submit the grammar and draw the derivation tree
show             print the grammar
check            list rules broken by alphabet edits
prune            delete rules broken by alphabet edits
sample [N]       generate N random words locally
save FILE        save the grammar as JSON
load FILE        load a grammar from JSON
help             show this help
quit             leave";

/// Parse a command line into a Command
pub fn parse(line: &str) -> Command {
    let line = line.trim();

    if line.starts_with('#') || line.is_empty() {
        return Command::Empty;
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match cmd {
        "t" | "terminal" => symbols(args, Command::Terminals),
        "n" | "nonterminal" => symbols(args, Command::Nonterminals),
        "rt" => symbols(args, Command::RemoveTerminals),
        "rn" => symbols(args, Command::RemoveNonterminals),
        "axiom" | "a" => required(cmd, args, Command::Axiom),
        "rule" | "r" => required(cmd, args, Command::Rule),
        "unrule" | "u" => required(cmd, args, Command::Unrule),
        "levels" | "l" => Command::Levels(args.to_string()),
        "word" | "w" => Command::Word(args.to_string()),
        "tree" => Command::Tree,
        "show" | "s" => Command::Show,
        "check" => Command::Check,
        "prune" => Command::Prune,
        "sample" => parse_sample(args),
        "save" => required(cmd, args, |path| Command::Save(PathBuf::from(path))),
        "load" => required(cmd, args, |path| Command::Load(PathBuf::from(path))),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(cmd.to_string()),
    }
}

fn symbols(args: &str, command: fn(Vec<String>) -> Command) -> Command {
    if args.is_empty() {
        return Command::Unknown("expected at least one symbol".to_string());
    }
    command(args.split_whitespace().map(str::to_string).collect())
}

fn required(cmd: &str, args: &str, command: impl FnOnce(String) -> Command) -> Command {
    if args.is_empty() {
        return Command::Unknown(format!("{} requires an argument", cmd));
    }
    command(args.to_string())
}

fn parse_sample(args: &str) -> Command {
    if args.is_empty() {
        return Command::Sample(1);
    }
    match args.parse() {
        Ok(amount) => Command::Sample(amount),
        Err(_) => Command::Unknown(format!("not an amount: {}", args)),
    }
}
