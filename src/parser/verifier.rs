use itertools::Itertools;

use crate::error_handling::ValidationError;
use crate::grammar::{Alphabet, ProductionRule};

// Checks one body against the alphabets: at most one nonterminal, and no
// symbol outside both alphabets
pub fn check_body(symbols: &[String], terminals: &Alphabet, nonterminals: &Alphabet) -> Result<(), ValidationError> {
    let body = symbols.concat();

    let count = symbols.iter().filter(|s| nonterminals.contains(s)).count();
    if count > 1 {
        return Err(ValidationError::MultipleNonTerminals { body, count });
    }

    let unknown = symbols
        .iter()
        .filter(|s| !terminals.contains(s) && !nonterminals.contains(s))
        .unique()
        .cloned()
        .collect_vec();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownSymbol { body, symbols: unknown });
    }

    Ok(())
}

pub fn check_rule(rule: &ProductionRule, terminals: &Alphabet, nonterminals: &Alphabet) -> Result<(), ValidationError> {
    if !nonterminals.contains(&rule.head) {
        return Err(ValidationError::UnknownHead(rule.head.clone()));
    }
    check_body(&rule.body, terminals, nonterminals)
}

// Stored rules are never purged on alphabet edits, so they are re-checked
// here against the current alphabets
pub fn invalid_rules<'a>(
    rules: &'a [ProductionRule],
    terminals: &Alphabet,
    nonterminals: &Alphabet,
) -> Vec<(&'a ProductionRule, ValidationError)> {
    rules
        .iter()
        .filter_map(|rule| check_rule(rule, terminals, nonterminals).err().map(|e| (rule, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SymbolKind;

    fn symbols(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn alphabets() -> (Alphabet, Alphabet) {
        let mut terminals = Alphabet::new(SymbolKind::Terminal);
        let mut nonterminals = Alphabet::new(SymbolKind::Nonterminal);
        for t in ["a", "b"] {
            terminals.add(t, &nonterminals).unwrap();
        }
        for n in ["S", "A"] {
            nonterminals.add(n, &terminals).unwrap();
        }
        (terminals, nonterminals)
    }

    #[test]
    fn body_with_one_nonterminal_passes() {
        let (terminals, nonterminals) = alphabets();
        assert_eq!(check_body(&symbols(&["a", "S", "b"]), &terminals, &nonterminals), Ok(()));
        assert_eq!(check_body(&symbols(&["b"]), &terminals, &nonterminals), Ok(()));
    }

    #[test]
    fn body_with_two_nonterminals_fails() {
        let (terminals, nonterminals) = alphabets();
        assert_eq!(
            check_body(&symbols(&["S", "a", "A"]), &terminals, &nonterminals),
            Err(ValidationError::MultipleNonTerminals {
                body: "SaA".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn unknown_symbols_are_reported_once() {
        let (terminals, nonterminals) = alphabets();
        assert_eq!(
            check_body(&symbols(&["x", "a", "x", "y"]), &terminals, &nonterminals),
            Err(ValidationError::UnknownSymbol {
                body: "xaxy".to_string(),
                symbols: symbols(&["x", "y"])
            })
        );
    }

    #[test]
    fn rules_are_rechecked_after_alphabet_edits() {
        let (mut terminals, mut nonterminals) = alphabets();
        let rules = vec![
            ProductionRule::new("S", symbols(&["a", "S"])),
            ProductionRule::new("S", symbols(&["b"])),
            ProductionRule::new("A", symbols(&["a"])),
        ];
        assert!(invalid_rules(&rules, &terminals, &nonterminals).is_empty());

        terminals.remove("b");
        nonterminals.remove("A");

        let invalid = invalid_rules(&rules, &terminals, &nonterminals);
        assert_eq!(invalid.len(), 2);
        assert_eq!(invalid[0].0, &rules[1]);
        assert_eq!(
            invalid[0].1,
            ValidationError::UnknownSymbol {
                body: "b".to_string(),
                symbols: symbols(&["b"])
            }
        );
        assert_eq!(invalid[1].1, ValidationError::UnknownHead("A".to_string()));
    }
}
