use std::cmp::Reverse;

use itertools::Itertools;

use crate::error_handling::ValidationError;
use crate::grammar::Alphabet;

pub const ARROW: &str = "->";
pub const OR: char = '|';

// Splits `head->body` into the trimmed head and the raw alternatives of the
// body. The last arrow on the line separates head from body.
pub fn split_line(line: &str) -> Result<(&str, Vec<&str>), ValidationError> {
    let line = line.trim();
    let malformed = || ValidationError::MalformedRule(line.to_string());

    let (head, body) = line.rsplit_once(ARROW).ok_or_else(malformed)?;
    let (head, body) = (head.trim(), body.trim());
    if head.is_empty() || body.is_empty() {
        return Err(malformed());
    }

    Ok((head, body.split(OR).collect()))
}

// Splits one alternative into symbols. Known symbols are matched longest
// first, anything else becomes a single-character symbol. Whitespace only
// separates.
pub fn split_symbols(body: &str, terminals: &Alphabet, nonterminals: &Alphabet) -> Vec<String> {
    let known = terminals
        .iter()
        .chain(nonterminals.iter())
        .sorted_by_key(|symbol| Reverse(symbol.len()))
        .collect_vec();

    let mut symbols = Vec::new();
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let symbol = known
            .iter()
            .find(|symbol| rest.starts_with(**symbol))
            .copied()
            .unwrap_or(&rest[..c.len_utf8()]);
        symbols.push(symbol.to_string());
        rest = &rest[symbol.len()..];
    }

    symbols
}
