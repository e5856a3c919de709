/*
    This module talks to the external grammar-processing service
*/

pub mod http;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::error_handling::ErrorType;
pub use http::HttpGrammarService;
pub use types::*;

// A failed round trip. The session stays usable after any of these.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum TransportError {
    #[error("Could not reach the grammar service: {0}")]
    Network(String),
    #[error("Grammar service answered with status {0}")]
    Status(u16),
    #[error("Unreadable answer from the grammar service: {0}")]
    Body(String),
}

impl ErrorType for TransportError {}

/// The two endpoints the workbench depends on
#[async_trait]
pub trait GrammarService: Send + Sync {
    /// Submit the whole grammar and receive a derivation tree
    async fn submit_grammar(&self, submission: &Submission) -> Result<DerivationTree, TransportError>;

    /// Ask whether a word belongs to the language of the last submitted grammar
    async fn check_word(&self, request: &CheckRequest) -> Result<CheckResponse, TransportError>;
}
