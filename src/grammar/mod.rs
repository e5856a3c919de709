/*
    This module is for storing and editing grammars
*/

mod alphabet;

use std::fmt::Display;

pub use alphabet::{Alphabet, SymbolKind};

use crate::error_handling::ValidationError;
use crate::parser::{self, lexer, verifier};
use crate::service::{Submission, WireRule};

// The symbols of a single alternative
pub type Alternative = Vec<String>;

#[derive(Debug, Clone)]
pub struct ProductionRule {
    pub head: String,
    pub body: Alternative,
}

impl ProductionRule {
    pub fn new(head: &str, body: Alternative) -> Self {
        ProductionRule {
            head: head.to_string(),
            body,
        }
    }

    pub fn body_text(&self) -> String {
        self.body.concat()
    }

    pub fn to_wire(&self) -> WireRule {
        WireRule {
            non_terminal_symbol: self.head.clone(),
            symbol_produced: self.body_text(),
        }
    }
}

// Rules are identified the way the service sees them, by head and body
// text, whatever symbols the body was split into
impl PartialEq for ProductionRule {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.body_text() == other.body_text()
    }
}

impl Eq for ProductionRule {}

impl Display for ProductionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.head, self.body_text())
    }
}

/// What happened to the alternatives of one rule line
#[derive(Debug, PartialEq, Default)]
pub struct RuleEdit {
    pub added: Vec<ProductionRule>,
    pub duplicates: Vec<ProductionRule>,
    pub rejected: Vec<ValidationError>,
}

/// The grammar being edited. Every mutation goes through a method that
/// restores the axiom invariant before returning.
#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    terminals: Alphabet,
    nonterminals: Alphabet,
    axiom: Option<String>,
    rules: Vec<ProductionRule>,
    levels: String,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar {
            terminals: Alphabet::new(SymbolKind::Terminal),
            nonterminals: Alphabet::new(SymbolKind::Nonterminal),
            axiom: None,
            rules: Vec::new(),
            levels: String::new(),
        }
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminals(&self) -> &Alphabet {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &Alphabet {
        &self.nonterminals
    }

    pub fn axiom(&self) -> Option<&str> {
        self.axiom.as_deref()
    }

    pub fn rules(&self) -> &[ProductionRule] {
        &self.rules
    }

    pub fn levels(&self) -> &str {
        &self.levels
    }

    pub fn add_terminal(&mut self, value: &str) -> Result<bool, ValidationError> {
        self.terminals.add(value, &self.nonterminals)
    }

    pub fn remove_terminal(&mut self, value: &str) -> bool {
        self.terminals.remove(value)
    }

    pub fn add_nonterminal(&mut self, value: &str) -> Result<bool, ValidationError> {
        let added = self.nonterminals.add(value, &self.terminals)?;
        self.refresh_axiom();
        Ok(added)
    }

    pub fn remove_nonterminal(&mut self, value: &str) -> bool {
        let removed = self.nonterminals.remove(value);
        self.refresh_axiom();
        removed
    }

    pub fn set_axiom(&mut self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if !self.nonterminals.contains(value) {
            return Err(ValidationError::InvalidAxiom(value.to_string()));
        }
        self.axiom = Some(value.to_string());
        Ok(())
    }

    // Falls back to the first nonterminal whenever the axiom is unset or has
    // left the nonterminal set
    fn refresh_axiom(&mut self) {
        let valid = self
            .axiom
            .as_ref()
            .is_some_and(|axiom| self.nonterminals.contains(axiom));
        if !valid {
            self.axiom = self.nonterminals.first().map(str::to_string);
        }
    }

    /// Parses a rule line and appends the new rules in order. Rules already
    /// present are skipped and reported as duplicates.
    pub fn add_rules(&mut self, line: &str) -> Result<RuleEdit, ValidationError> {
        let parsed = parser::parse_rule_line(line, &self.terminals, &self.nonterminals)?;

        let mut edit = RuleEdit {
            rejected: parsed.errors,
            ..RuleEdit::default()
        };
        for rule in parsed.rules {
            if self.rules.contains(&rule) {
                edit.duplicates.push(rule);
            } else {
                self.rules.push(rule.clone());
                edit.added.push(rule);
            }
        }

        Ok(edit)
    }

    pub fn remove_rule(&mut self, head: &str, body: &str) -> Result<ProductionRule, ValidationError> {
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let index = self
            .rules
            .iter()
            .position(|rule| rule.head == head && rule.body_text() == body)
            .ok_or_else(|| ValidationError::UnknownRule {
                head: head.to_string(),
                body: body.clone(),
            })?;
        Ok(self.rules.remove(index))
    }

    // Whitespace is dropped, the value itself is left to the service
    pub fn set_levels(&mut self, text: &str) {
        self.levels = text.chars().filter(|c| !c.is_whitespace()).collect();
    }

    /// Rules that no longer satisfy the alphabets after later edits
    pub fn invalid_rules(&self) -> Vec<(&ProductionRule, ValidationError)> {
        verifier::invalid_rules(&self.rules, &self.terminals, &self.nonterminals)
    }

    /// Deletes the rules reported by `invalid_rules` and returns them
    pub fn prune_rules(&mut self) -> Vec<ProductionRule> {
        let (keep, pruned): (Vec<_>, Vec<_>) = self
            .rules
            .drain(..)
            .partition(|rule| verifier::check_rule(rule, &self.terminals, &self.nonterminals).is_ok());
        self.rules = keep;
        pruned
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.terminals.is_empty() {
            missing.push("terminals");
        }
        if self.nonterminals.is_empty() {
            missing.push("nonterminals");
        }
        if self.rules.is_empty() {
            missing.push("rules");
        }
        if self.levels.trim().is_empty() {
            missing.push("levels");
        }
        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_fields().is_empty()
    }

    // The payload for the current state, complete or not
    pub fn snapshot(&self) -> Submission {
        Submission {
            terminal_symbols: self.terminals.to_vec(),
            non_terminal_symbols: self.nonterminals.to_vec(),
            axiomatic_symbol: self.axiom.clone().unwrap_or_default(),
            production_rules: self.rules.iter().map(ProductionRule::to_wire).collect(),
            levels: self.levels.clone(),
        }
    }

    // Complete grammars whose rules all still match the alphabets
    pub fn to_submission(&self) -> Result<Submission, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::NotSubmittable(missing));
        }
        let stale = self.invalid_rules().len();
        if stale > 0 {
            return Err(ValidationError::StaleRules(stale));
        }
        Ok(self.snapshot())
    }

    /// Rebuilds a grammar from a payload. Symbols go through the same checks
    /// as interactive edits. Rules that no longer match the alphabets are
    /// kept, as they would be in memory, and show up in `invalid_rules`.
    pub fn from_submission(submission: &Submission) -> Result<Grammar, ValidationError> {
        let mut grammar = Grammar::new();

        for symbol in &submission.terminal_symbols {
            grammar.add_terminal(symbol)?;
        }
        for symbol in &submission.non_terminal_symbols {
            grammar.add_nonterminal(symbol)?;
        }
        if !submission.axiomatic_symbol.is_empty() {
            grammar.set_axiom(&submission.axiomatic_symbol)?;
        }

        for wire in &submission.production_rules {
            let head = wire.non_terminal_symbol.trim();
            if head.is_empty() {
                return Err(ValidationError::MalformedRule(format!("->{}", wire.symbol_produced)));
            }
            let body = lexer::split_symbols(&wire.symbol_produced, &grammar.terminals, &grammar.nonterminals);
            if body.is_empty() {
                return Err(ValidationError::EmptyAlternative(head.to_string()));
            }
            let rule = ProductionRule::new(head, body);
            if !grammar.rules.contains(&rule) {
                grammar.rules.push(rule);
            }
        }

        grammar.set_levels(&submission.levels);
        Ok(grammar)
    }
}
