use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A production rule as the grammar service spells it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRule {
    pub non_terminal_symbol: String,
    pub symbol_produced: String,
}

/// Payload of the Submit Grammar endpoint, also used as the save format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub terminal_symbols: Vec<String>,
    pub non_terminal_symbols: Vec<String>,
    pub axiomatic_symbol: String,
    pub production_rules: Vec<WireRule>,
    pub levels: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub word: String,
}

/// Answer of the Check Word endpoint. Empty sequences mean the word is not
/// in the language.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    #[serde(default)]
    pub axiomatic_symbol: String,
    #[serde(default)]
    pub derivation_steps: Vec<String>,
    #[serde(default)]
    pub derivative_products: Vec<WireRule>,
}

/// Tree returned by Submit Grammar. Its shape belongs to the service and is
/// only passed through to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationTree(pub Value);
