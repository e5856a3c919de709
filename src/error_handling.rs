use std::fmt::Display;

use thiserror::Error;

use crate::grammar::SymbolKind;

pub trait ErrorType: Display + PartialEq {}

// The editor field an error was raised from
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Field {
    Terminals,
    Nonterminals,
    Axiom,
    Rules,
    Levels,
    Word,
    Tree,
    File,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Terminals => "terminals",
            Field::Nonterminals => "nonterminals",
            Field::Axiom => "axiom",
            Field::Rules => "rules",
            Field::Levels => "levels",
            Field::Word => "word",
            Field::Tree => "tree",
            Field::File => "file",
        };
        write!(f, "{}", name)
    }
}

// Rejections of a single edit. None of them mutate the grammar.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ValidationError {
    #[error("`{symbol}` is already a {other} symbol, it cannot be both")]
    CrossMembership { symbol: String, other: SymbolKind },
    #[error("Symbol `{0}` contains whitespace")]
    WhitespaceInSymbol(String),
    #[error("Expected a rule of the form `A->b|c`, got `{0}`")]
    MalformedRule(String),
    #[error("`{0}` is not in the nonterminal set")]
    UnknownHead(String),
    #[error("Empty alternative for `{0}`")]
    EmptyAlternative(String),
    #[error("`{body}` has {count} nonterminals, only one is allowed")]
    MultipleNonTerminals { body: String, count: usize },
    #[error("`{body}` uses symbols outside both alphabets: {}", .symbols.join(", "))]
    UnknownSymbol { body: String, symbols: Vec<String> },
    #[error("Axiom `{0}` is not in the nonterminal set")]
    InvalidAxiom(String),
    #[error("No rule `{head} -> {body}`")]
    UnknownRule { head: String, body: String },
    #[error("The word may not contain whitespace")]
    WhitespaceInWord,
    #[error("Grammar is incomplete, missing: {}", .0.join(", "))]
    NotSubmittable(Vec<&'static str>),
    #[error("{0} rules no longer match the alphabets")]
    StaleRules(usize),
}

impl ErrorType for ValidationError {}

#[derive(Debug, PartialEq)]
pub struct Report<T: ErrorType> {
    pub field: Field,
    pub error: T,
}

impl<T: ErrorType> Report<T> {
    pub fn new(field: Field, error: T) -> Self {
        Report { field, error }
    }
}

impl<T: ErrorType> Display for Report<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", highlight(self.field, &self.error))
    }
}

// Formats a message the way every user-facing error is shown
pub fn highlight(field: Field, message: impl Display) -> String {
    format!("\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", field, message)
}
