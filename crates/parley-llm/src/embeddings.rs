//! Embeddings client backing embedding-ranked context selection.

use parley_context::{ContextError, ContextResult, Embedder};
use tracing::debug;

use crate::client::ApiTransport;
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::runtime::run_async;
use crate::wire::{EmbeddingRequest, EmbeddingResponse};

/// Client for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingsClient {
    transport: ApiTransport,
}

impl EmbeddingsClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        Ok(Self {
            transport: ApiTransport::new(config)?,
        })
    }

    pub async fn embed_async(&self, text: &str) -> LlmResult<Vec<f32>> {
        let model = &self.transport.config().embedding_model;
        let request = EmbeddingRequest { model, input: text };
        let response: EmbeddingResponse = self.transport.post_json("embeddings", &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or(LlmError::EmptyEmbedding)?;
        debug!(%model, dimensions = embedding.len(), "Embedding received");
        Ok(embedding)
    }
}

impl Embedder for EmbeddingsClient {
    fn embed(&self, text: &str) -> ContextResult<Vec<f32>> {
        run_async(|| self.embed_async(text)).map_err(|e| ContextError::Embedding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_context::{ContextSelector, Corpus, EmbeddingSelector};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> EmbeddingsClient {
        EmbeddingsClient::new(LlmConfig::default().with_api_base(server.uri())).unwrap()
    }

    async fn mount_embedding(server: &MockServer, input: &str, embedding: Vec<f32>) {
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({ "input": input })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": embedding, "index": 0 }],
                "model": "text-embedding-3-small"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn returns_first_embedding() {
        let server = MockServer::start().await;
        mount_embedding(&server, "hello", vec![0.5, 0.25]).await;

        assert_eq!(client(&server).embed("hello").unwrap(), vec![0.5, 0.25]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failures_map_to_context_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).embed("hello").unwrap_err();
        assert!(matches!(err, ContextError::Embedding(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drives_embedding_selection() {
        let server = MockServer::start().await;
        mount_embedding(&server, "who bought what", vec![1.0, 0.0]).await;
        mount_embedding(&server, "CREATE TABLE users (id INTEGER);", vec![0.0, 1.0]).await;
        mount_embedding(&server, "CREATE TABLE orders (id INTEGER);", vec![1.0, 0.1]).await;

        let corpus: Corpus = [
            ("users", "CREATE TABLE users (id INTEGER);"),
            ("orders", "CREATE TABLE orders (id INTEGER);"),
        ]
        .into_iter()
        .collect();

        let selected = EmbeddingSelector::new(client(&server))
            .with_top_n(1)
            .select("who bought what", &corpus)
            .unwrap();
        assert_eq!(selected, vec!["orders"]);
    }
}
