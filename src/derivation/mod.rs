/*
    This module tracks the word under test and the service's answer for it
*/

use crate::error_handling::ValidationError;
use crate::service::{CheckResponse, TransportError, WireRule};

/// A check to dispatch for the word `word`. Its answer must be handed back
/// with the same `seq`.
#[derive(Debug, PartialEq, Clone)]
pub struct CheckTicket {
    pub seq: u64,
    pub word: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct DerivationStep {
    pub rule: WireRule,
    pub form: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Derivation {
    pub axiom: String,
    pub steps: Vec<DerivationStep>,
}

impl Derivation {
    // The two sequences of a response are zipped into steps. They must line up.
    pub fn from_response(response: CheckResponse) -> Result<Derivation, TransportError> {
        let CheckResponse {
            axiomatic_symbol,
            derivation_steps,
            derivative_products,
        } = response;

        if derivation_steps.len() != derivative_products.len() {
            return Err(TransportError::Body(format!(
                "{} derivation steps for {} applied rules",
                derivation_steps.len(),
                derivative_products.len()
            )));
        }

        let steps = derivative_products
            .into_iter()
            .zip(derivation_steps)
            .map(|(rule, form)| DerivationStep { rule, form })
            .collect();

        Ok(Derivation {
            axiom: axiomatic_symbol,
            steps,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DerivationState {
    Idle,
    Pending { seq: u64 },
    Member(Derivation),
    NonMember,
    Failed(TransportError),
}

#[derive(Debug)]
pub struct DerivationView {
    query: String,
    latest_seq: u64,
    state: DerivationState,
}

impl Default for DerivationView {
    fn default() -> Self {
        DerivationView {
            query: String::new(),
            latest_seq: 0,
            state: DerivationState::Idle,
        }
    }
}

impl DerivationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &DerivationState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DerivationState::Pending { .. })
    }

    /// Replaces the word under test. Every accepted edit supersedes all
    /// outstanding checks, a non-empty word also asks for a new one.
    pub fn set_query(&mut self, text: &str) -> Result<Option<CheckTicket>, ValidationError> {
        if text.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInWord);
        }

        self.query = text.to_string();
        self.latest_seq += 1;

        if self.query.is_empty() {
            self.state = DerivationState::Idle;
            return Ok(None);
        }

        self.state = DerivationState::Pending { seq: self.latest_seq };
        Ok(Some(CheckTicket {
            seq: self.latest_seq,
            word: self.query.clone(),
        }))
    }

    /// Applies the answer to check `seq`. Answers to superseded checks are
    /// dropped and `false` is returned.
    pub fn apply(&mut self, seq: u64, result: Result<CheckResponse, TransportError>) -> bool {
        if seq != self.latest_seq || !self.is_pending() {
            log::debug!("Discarding answer {} (latest is {})", seq, self.latest_seq);
            return false;
        }

        self.state = match result.and_then(Derivation::from_response) {
            Ok(derivation) if derivation.steps.is_empty() => DerivationState::NonMember,
            Ok(derivation) => DerivationState::Member(derivation),
            Err(error) => {
                log::warn!("Check for `{}` failed: {}", self.query, error);
                DerivationState::Failed(error)
            }
        };
        true
    }

    pub fn render(&self) -> Vec<String> {
        match &self.state {
            DerivationState::Idle => Vec::new(),
            DerivationState::Pending { .. } => vec![format!("checking {} ...", self.query)],
            DerivationState::Member(derivation) => {
                let mut lines = vec![derivation.axiom.clone()];
                lines.extend(derivation.steps.iter().map(|step| {
                    format!(
                        "  → {} → {}    {}",
                        step.rule.non_terminal_symbol, step.rule.symbol_produced, step.form
                    )
                }));
                lines.push(format!("{} ∈ L(G)", self.query));
                lines
            }
            DerivationState::NonMember => vec![format!("{} ∉ L(G)", self.query)],
            DerivationState::Failed(_) => vec![format!("{} ?", self.query)],
        }
    }
}
