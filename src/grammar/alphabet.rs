use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ValidationError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Terminal => write!(f, "terminal"),
            SymbolKind::Nonterminal => write!(f, "nonterminal"),
        }
    }
}

/// An insertion-ordered set of unique symbols of one kind.
#[derive(Debug, PartialEq, Clone)]
pub struct Alphabet {
    kind: SymbolKind,
    symbols: Vec<String>,
}

impl Alphabet {
    pub fn new(kind: SymbolKind) -> Self {
        Alphabet {
            kind,
            symbols: Vec::new(),
        }
    }

    /// Adds a trimmed symbol, keeping this alphabet disjoint from `other`.
    ///
    /// Returns `Ok(false)` when there was nothing to add (blank input or a
    /// symbol already present).
    pub fn add(&mut self, value: &str, other: &Alphabet) -> Result<bool, ValidationError> {
        let symbol = value.trim();
        if symbol.is_empty() {
            return Ok(false);
        }
        if symbol.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInSymbol(symbol.to_string()));
        }
        if other.contains(symbol) {
            return Err(ValidationError::CrossMembership {
                symbol: symbol.to_string(),
                other: other.kind,
            });
        }
        if self.contains(symbol) {
            return Ok(false);
        }

        self.symbols.push(symbol.to_string());
        Ok(true)
    }

    pub fn remove(&mut self, value: &str) -> bool {
        match self.symbols.iter().position(|s| s == value) {
            Some(index) => {
                self.symbols.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn first(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.symbols.clone()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ {} }}", self.symbols.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn alphabets() -> (Alphabet, Alphabet) {
        (Alphabet::new(SymbolKind::Terminal), Alphabet::new(SymbolKind::Nonterminal))
    }

    #[test]
    fn add_trims_and_keeps_order() {
        let (mut terminals, nonterminals) = alphabets();
        let inputs = vec![" b", "a ", "c"];
        let answers = vec![true, true, true];

        for (input, answer) in zip(inputs, answers) {
            assert_eq!(terminals.add(input, &nonterminals), Ok(answer));
        }
        assert_eq!(terminals.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn add_ignores_blank_and_duplicates() {
        let (mut terminals, nonterminals) = alphabets();
        terminals.add("a", &nonterminals).unwrap();

        for input in ["", "   ", "a", " a "] {
            assert_eq!(terminals.add(input, &nonterminals), Ok(false));
        }
        assert_eq!(terminals.to_vec(), vec!["a".to_string()]);
    }

    #[test]
    fn add_rejects_cross_membership_both_ways() {
        let (mut terminals, mut nonterminals) = alphabets();
        terminals.add("a", &nonterminals).unwrap();
        nonterminals.add("S", &terminals).unwrap();

        assert_eq!(
            nonterminals.add("a", &terminals),
            Err(ValidationError::CrossMembership {
                symbol: "a".to_string(),
                other: SymbolKind::Terminal
            })
        );
        assert_eq!(
            terminals.add(" S", &nonterminals),
            Err(ValidationError::CrossMembership {
                symbol: "S".to_string(),
                other: SymbolKind::Nonterminal
            })
        );
        assert_eq!(terminals.to_vec(), vec!["a".to_string()]);
        assert_eq!(nonterminals.to_vec(), vec!["S".to_string()]);
    }

    #[test]
    fn add_rejects_inner_whitespace() {
        let (mut terminals, nonterminals) = alphabets();
        assert_eq!(
            terminals.add("a b", &nonterminals),
            Err(ValidationError::WhitespaceInSymbol("a b".to_string()))
        );
        assert!(terminals.is_empty());
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let (mut terminals, nonterminals) = alphabets();
        terminals.add("a", &nonterminals).unwrap();
        terminals.add("b", &nonterminals).unwrap();

        assert!(!terminals.remove("z"));
        assert!(terminals.remove("a"));
        assert_eq!(terminals.first(), Some("b"));
        assert_eq!(terminals.to_string(), "{ b }");
    }
}
