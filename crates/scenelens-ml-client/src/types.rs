//! ML service request/response types.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Request to embed a text query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextEmbeddingRequest {
    pub text: String,
}

/// Request to embed an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEmbeddingRequest {
    /// Base64-encoded JPEG
    pub image_base64: String,
}

/// Embedding returned for either modality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
}

/// Visual question about an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VqaRequest {
    /// Base64-encoded JPEG
    pub image_base64: String,
    pub question: String,
}

/// Free-text answer to a visual question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VqaResponse {
    pub answer: String,
}
