/*
    This module parses production rule lines such as `S->aS|b`
*/

pub mod lexer;
pub mod verifier;

use itertools::Itertools;

use crate::error_handling::ValidationError;
use crate::grammar::{Alphabet, ProductionRule};

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Outcome of one rule line whose head was accepted. Each alternative either
/// became a rule or was rejected on its own.
#[derive(Debug, PartialEq, Default)]
pub struct RuleParse {
    pub rules: Vec<ProductionRule>,
    pub errors: Vec<ValidationError>,
}

pub fn parse_alternative(
    head: &str,
    alternative: &str,
    terminals: &Alphabet,
    nonterminals: &Alphabet,
) -> Result<ProductionRule> {
    let symbols = lexer::split_symbols(alternative, terminals, nonterminals);
    if symbols.is_empty() {
        return Err(ValidationError::EmptyAlternative(head.to_string()));
    }

    verifier::check_body(&symbols, terminals, nonterminals)?;

    Ok(ProductionRule::new(head, symbols))
}

// Parses a line into rules. A malformed line or an unknown head rejects the
// whole line, a bad alternative only rejects itself.
pub fn parse_rule_line(line: &str, terminals: &Alphabet, nonterminals: &Alphabet) -> Result<RuleParse> {
    let (head, alternatives) = lexer::split_line(line)?;

    if !nonterminals.contains(head) {
        return Err(ValidationError::UnknownHead(head.to_string()));
    }

    let (rules, errors) = alternatives
        .into_iter()
        .map(|alternative| parse_alternative(head, alternative, terminals, nonterminals))
        .partition_result();

    Ok(RuleParse { rules, errors })
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;
    use crate::grammar::SymbolKind;

    fn alphabets(terminal: &[&str], nonterminal: &[&str]) -> (Alphabet, Alphabet) {
        let mut terminals = Alphabet::new(SymbolKind::Terminal);
        let mut nonterminals = Alphabet::new(SymbolKind::Nonterminal);
        for t in terminal {
            terminals.add(t, &nonterminals).unwrap();
        }
        for n in nonterminal {
            nonterminals.add(n, &terminals).unwrap();
        }
        (terminals, nonterminals)
    }

    fn rule(head: &str, body: &[&str]) -> ProductionRule {
        ProductionRule::new(head, body.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn parse_normal_line() {
        let (terminals, nonterminals) = alphabets(&["a", "b"], &["S"]);

        assert_eq!(
            parse_rule_line("S->aS|b", &terminals, &nonterminals),
            Ok(RuleParse {
                rules: vec![rule("S", &["a", "S"]), rule("S", &["b"])],
                errors: vec![]
            })
        );
    }

    #[test]
    fn parse_malformed_line() {
        let (terminals, nonterminals) = alphabets(&["a", "b"], &["S"]);

        for line in ["S", "SaS|b", "S-", "S->", "->b"] {
            assert_eq!(
                parse_rule_line(line, &terminals, &nonterminals),
                Err(ValidationError::MalformedRule(line.to_string()))
            );
        }
    }

    #[test]
    fn parse_unknown_head() {
        let (terminals, nonterminals) = alphabets(&["a", "b"], &["S"]);

        assert_eq!(
            parse_rule_line("A->a|b", &terminals, &nonterminals),
            Err(ValidationError::UnknownHead("A".to_string()))
        );
        assert_eq!(
            parse_rule_line("a->b", &terminals, &nonterminals),
            Err(ValidationError::UnknownHead("a".to_string()))
        );
    }

    #[test]
    fn parse_two_nonterminals() {
        let (terminals, nonterminals) = alphabets(&["a", "b"], &["S"]);

        assert_eq!(
            parse_rule_line("S->SS", &terminals, &nonterminals),
            Ok(RuleParse {
                rules: vec![],
                errors: vec![ValidationError::MultipleNonTerminals {
                    body: "SS".to_string(),
                    count: 2
                }]
            })
        );
    }

    #[test]
    fn parse_keeps_valid_alternatives() {
        let (terminals, nonterminals) = alphabets(&["a", "b"], &["S", "A"]);
        let lines = vec!["S->aS|SA|b", "S->x|a|", "A -> a A | b"];
        let answers = vec![
            RuleParse {
                rules: vec![rule("S", &["a", "S"]), rule("S", &["b"])],
                errors: vec![ValidationError::MultipleNonTerminals {
                    body: "SA".to_string(),
                    count: 2,
                }],
            },
            RuleParse {
                rules: vec![rule("S", &["a"])],
                errors: vec![
                    ValidationError::UnknownSymbol {
                        body: "x".to_string(),
                        symbols: vec!["x".to_string()],
                    },
                    ValidationError::EmptyAlternative("S".to_string()),
                ],
            },
            RuleParse {
                rules: vec![rule("A", &["a", "A"]), rule("A", &["b"])],
                errors: vec![],
            },
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_rule_line(line, &terminals, &nonterminals).unwrap(), answer);
        }
    }

    #[test]
    fn parse_multi_character_symbols() {
        let (terminals, nonterminals) = alphabets(&["id", "+"], &["E", "T"]);

        assert_eq!(
            parse_rule_line("E->id+T|id", &terminals, &nonterminals).unwrap().rules,
            vec![rule("E", &["id", "+", "T"]), rule("E", &["id"])]
        );
    }
}
