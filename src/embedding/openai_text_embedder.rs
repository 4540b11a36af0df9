//! OpenAI API-based text embedder implementation.
//!
//! This module provides a text embedder using OpenAI's Embeddings API.
//! Requires the `embeddings-openai` feature to be enabled.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::EmbedderConfig;
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{EmbedFailure, Result, ValluError};
use crate::vector::core::vector::Vector;

/// Request structure for OpenAI Embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    /// Model identifier to use for embeddings.
    model: &'a str,
    /// Input text to embed.
    input: &'a str,
    /// Optional custom dimension (only for newer models).
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

/// Response structure from OpenAI Embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

/// Individual embedding data from API response.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// OpenAI API-based text embedder.
///
/// Sends `{model, input}` to the configured endpoint with a bearer
/// credential and reads `data[0].embedding` from the answer.
///
/// # Examples
///
/// ```no_run
/// use vallu::embedding::TextEmbedder;
/// use vallu::embedding::OpenAITextEmbedder;
///
/// # async fn example() -> vallu::error::Result<()> {
/// let embedder = OpenAITextEmbedder::new(
///     Some(std::env::var("OPENAI_API_KEY").unwrap_or_default()),
///     "text-embedding-ada-002".to_string(),
/// )?;
///
/// let vector = embedder.embed("What does the text say about humility?").await?;
/// println!("Embedding dimension: {}", vector.dimension());
/// # Ok(())
/// # }
/// ```
pub struct OpenAITextEmbedder {
    /// HTTP client for making API requests.
    client: Client,
    /// OpenAI API key for authentication.
    api_key: String,
    /// OpenAI model name (e.g., "text-embedding-ada-002").
    model: String,
    /// Embeddings endpoint URL.
    endpoint: String,
    /// Dimension of the output embeddings.
    dimension: usize,
}

impl OpenAITextEmbedder {
    /// Create a new OpenAI embedder against the default endpoint.
    ///
    /// # Errors
    ///
    /// [`ValluError::MissingCredential`] when `api_key` is absent or blank.
    pub fn new(api_key: Option<String>, model: String) -> Result<Self> {
        let config = EmbedderConfig {
            model,
            api_key,
            ..EmbedderConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create an embedder from configuration.
    pub fn from_config(config: &EmbedderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ValluError::missing_credential(
                    "no API key configured for the embedding service; \
                     set VALLU_OPENAI_API_KEY or OPENAI_API_KEY",
                )
            })?
            .to_string();

        let dimension = config
            .dimension
            .unwrap_or_else(|| Self::default_dimension(&config.model));

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            dimension,
        })
    }

    /// Get the default dimension for a given model.
    ///
    /// Default dimension: 1536 for small/ada-002, 3072 for large
    fn default_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    /// The endpoint this embedder posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turn an HTTP status and body into an embedding, classifying failures.
pub(crate) fn parse_embedding_response(status: StatusCode, body: &str) -> Result<Vector> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ValluError::embed(
            EmbedFailure::Authentication,
            format!("OpenAI API rejected the credential (status {status}): {body}"),
        ));
    }
    if !status.is_success() {
        return Err(ValluError::embed(
            EmbedFailure::Api,
            format!("OpenAI API error (status {status}): {body}"),
        ));
    }

    let response: EmbeddingResponse = serde_json::from_str(body).map_err(|e| {
        ValluError::embed(
            EmbedFailure::MalformedResponse,
            format!("Failed to parse OpenAI response: {e}. Response text: {body}"),
        )
    })?;

    let embedding = response
        .data
        .into_iter()
        .next()
        .and_then(|data| data.embedding)
        .filter(|embedding| !embedding.is_empty())
        .ok_or_else(|| {
            ValluError::embed(
                EmbedFailure::MalformedResponse,
                format!("No embedding in response: {body}"),
            )
        })?;

    Ok(Vector::new(embedding))
}

#[async_trait]
impl TextEmbedder for OpenAITextEmbedder {
    /// Generate an embedding vector for the given text using OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns an embed error if:
    /// - API request fails
    /// - Authentication fails
    /// - Response parsing fails
    async fn embed(&self, text: &str) -> Result<Vector> {
        let dimensions = if self.dimension == Self::default_dimension(&self.model) {
            None
        } else {
            Some(self.dimension)
        };

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions,
        };

        debug!("Requesting embedding from {} ({})", self.endpoint, self.model);
        let http_response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ValluError::embed(
                    EmbedFailure::Network,
                    format!("OpenAI API request failed: {e}"),
                )
            })?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            ValluError::embed(
                EmbedFailure::Network,
                format!("Failed to read response text: {e}"),
            )
        })?;

        let vector = parse_embedding_response(status, &response_text).inspect_err(|e| {
            warn!("Embedding request failed: {e}");
        })?;
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the OpenAI model identifier.
    fn name(&self) -> &str {
        &self.model
    }
}
