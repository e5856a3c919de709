use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CheckRequest, CheckResponse, DerivationTree, GrammarService, Submission, TransportError};

pub const SUBMIT_PATH: &str = "/formal-grammar/cqc";
pub const CHECK_PATH: &str = "/formal-grammar/check";

/// reqwest client for a remote grammar service
pub struct HttpGrammarService {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpGrammarService {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

#[async_trait]
impl GrammarService for HttpGrammarService {
    async fn submit_grammar(&self, submission: &Submission) -> Result<DerivationTree, TransportError> {
        self.post_json(SUBMIT_PATH, submission).await
    }

    async fn check_word(&self, request: &CheckRequest) -> Result<CheckResponse, TransportError> {
        self.post_json(CHECK_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;
    use crate::service::WireRule;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn check_handler(Json(request): Json<CheckRequest>) -> Json<Value> {
        if request.word == "ab" {
            Json(json!({
                "axiomaticSymbol": "S",
                "derivationSteps": ["aA", "ab"],
                "derivativeProducts": [
                    {"nonTerminalSymbol": "S", "symbolProduced": "aA"},
                    {"nonTerminalSymbol": "A", "symbolProduced": "b"}
                ]
            }))
        } else {
            Json(json!({"axiomaticSymbol": "S", "derivationSteps": [], "derivativeProducts": []}))
        }
    }

    // Echoes the submission back so the test can see what went over the wire
    async fn submit_handler(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({"name": "S", "children": [], "echo": body}))
    }

    fn submission() -> Submission {
        Submission {
            terminal_symbols: vec!["a".to_string(), "b".to_string()],
            non_terminal_symbols: vec!["S".to_string()],
            axiomatic_symbol: "S".to_string(),
            production_rules: vec![WireRule {
                non_terminal_symbol: "S".to_string(),
                symbol_produced: "aS".to_string(),
            }],
            levels: "2".to_string(),
        }
    }

    #[tokio::test]
    async fn check_word_decodes_derivation() {
        let url = serve(Router::new().route(CHECK_PATH, post(check_handler))).await;
        let service = HttpGrammarService::new(url);

        let member = service
            .check_word(&CheckRequest { word: "ab".to_string() })
            .await
            .unwrap();
        assert_eq!(member.derivation_steps, vec!["aA".to_string(), "ab".to_string()]);
        assert_eq!(member.derivative_products[1].symbol_produced, "b");

        let non_member = service
            .check_word(&CheckRequest { word: "ba".to_string() })
            .await
            .unwrap();
        assert!(non_member.derivation_steps.is_empty());
    }

    #[tokio::test]
    async fn submit_grammar_sends_camel_case_payload() {
        let url = serve(Router::new().route(SUBMIT_PATH, post(submit_handler))).await;
        let service = HttpGrammarService::new(format!("{}/", url));

        let tree = service.submit_grammar(&submission()).await.unwrap();
        assert_eq!(tree.0["name"], "S");
        assert_eq!(tree.0["echo"]["nonTerminalSymbols"], json!(["S"]));
        assert_eq!(tree.0["echo"]["productionRules"][0]["symbolProduced"], "aS");
        assert_eq!(tree.0["echo"]["levels"], "2");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            CHECK_PATH,
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let service = HttpGrammarService::new(serve(app).await);

        let result = service.check_word(&CheckRequest { word: "a".to_string() }).await;
        assert_eq!(result, Err(TransportError::Status(500)));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let app = Router::new().route(CHECK_PATH, post(|| async { "not json" }));
        let service = HttpGrammarService::new(serve(app).await);

        let result = service.check_word(&CheckRequest { word: "a".to_string() }).await;
        assert!(matches!(result, Err(TransportError::Body(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpGrammarService::new(format!("http://{}", addr))
            .with_timeout(Duration::from_secs(2));
        let result = service.submit_grammar(&submission()).await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
