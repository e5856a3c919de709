/*
    This module generates sample words
*/

use rand::prelude::*;
use thiserror::Error;

use crate::error_handling::ErrorType;
use crate::grammar::*;

#[derive(Error, Debug, PartialEq)]
pub enum GenerateError {
    #[error("No axiom to start from")]
    MissingAxiom,
    // An undefined nonterminal was reached
    #[error("No rule for nonterminal `{0}`")]
    UndefinedNonterminal(String),
    #[error("Expansion depth `{0}` is not a number")]
    InvalidLevels(String),
    #[error("No word reached within {0} expansions")]
    DepthExhausted(usize),
    #[error("Expansion depth {0} is over the sampling limit of {MAX_LEVELS}")]
    TooDeep(usize),
}

// Every expansion keeps its sentential form, so the depth is bounded
pub const MAX_LEVELS: usize = 1000;

impl ErrorType for GenerateError {}

#[derive(Debug, PartialEq)]
pub struct Sample {
    pub word: String,
    // Sentential forms from the axiom to the word
    pub forms: Vec<String>,
}

pub type GenResult = Result<Sample, GenerateError>;

pub fn levels(grammar: &Grammar) -> Result<usize, GenerateError> {
    let levels = grammar
        .levels()
        .parse()
        .map_err(|_| GenerateError::InvalidLevels(grammar.levels().to_string()))?;
    if levels > MAX_LEVELS {
        return Err(GenerateError::TooDeep(levels));
    }
    Ok(levels)
}

// Derives one random word from the axiom, expanding the leftmost nonterminal
// at most `levels` times
pub fn generate(grammar: &Grammar, rng: &mut impl Rng) -> GenResult {
    let axiom = grammar.axiom().ok_or(GenerateError::MissingAxiom)?;
    let levels = levels(grammar)?;

    let mut form = vec![axiom.to_string()];
    let mut forms = vec![axiom.to_string()];

    for _ in 0..levels {
        let Some(position) = form.iter().position(|s| grammar.nonterminals().contains(s)) else {
            break;
        };
        let rule = choose_rule(grammar, &form[position], rng)?;
        form.splice(position..=position, rule.body.iter().cloned());
        forms.push(form.concat());
    }

    if form.iter().any(|s| grammar.nonterminals().contains(s)) {
        return Err(GenerateError::DepthExhausted(levels));
    }

    Ok(Sample {
        word: form.concat(),
        forms,
    })
}

fn choose_rule<'a>(grammar: &'a Grammar, nonterminal: &str, rng: &mut impl Rng) -> Result<&'a ProductionRule, GenerateError> {
    grammar
        .rules()
        .iter()
        .filter(|rule| rule.head == nonterminal)
        .choose(rng)
        .ok_or_else(|| GenerateError::UndefinedNonterminal(nonterminal.to_string()))
}

// Draws up to `amount` words, giving up on a draw after a few attempts so
// grammars that rarely terminate still return what they found
pub fn sample(grammar: &Grammar, amount: usize, rng: &mut impl Rng) -> Result<Vec<Sample>, GenerateError> {
    const ATTEMPTS: usize = 16;

    let mut samples = Vec::with_capacity(amount);
    for _ in 0..amount {
        let mut last_error = None;
        for _ in 0..ATTEMPTS {
            match generate(grammar, rng) {
                Ok(sample) => {
                    samples.push(sample);
                    last_error = None;
                    break;
                }
                Err(error @ GenerateError::DepthExhausted(_)) => last_error = Some(error),
                Err(error) => return Err(error),
            }
        }
        if let Some(error) = last_error {
            if samples.is_empty() {
                return Err(error);
            }
        }
    }

    Ok(samples)
}
