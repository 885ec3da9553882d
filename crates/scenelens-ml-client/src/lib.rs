//! Client for the vision-language model service.
//!
//! This crate talks to an external model service over HTTP (text and image
//! embeddings, visual question answering) and builds the two relevance
//! scorers the search engine consumes:
//! - [`EmbeddingScorer`]: cosine similarity of query and frame embeddings
//! - [`JudgmentScorer`]: a yes/no question about each frame

pub mod client;
pub mod encode;
pub mod error;
pub mod judgment;
pub mod scorer;
pub mod similarity;
pub mod types;

pub use client::{MlClient, MlClientConfig};
pub use encode::{encode_jpeg, encode_jpeg_base64, JPEG_QUALITY};
pub use error::{MlError, MlResult};
pub use judgment::{is_affirmative, judgment_confidence};
pub use scorer::{EmbeddingScorer, JudgmentScorer};
pub use similarity::cosine_similarity;
