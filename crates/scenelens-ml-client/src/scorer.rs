//! Relevance scorers backed by the model service.
//!
//! Both scorers are plain values holding a shared [`MlClient`]; inject them
//! into a search rather than keeping process-wide instances.

use std::sync::Arc;

use async_trait::async_trait;
use scenelens_engine::{CollaboratorResult, Relevance, RelevanceScorer};
use scenelens_models::FrameImage;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::MlClient;
use crate::encode::encode_jpeg_base64;
use crate::error::MlResult;
use crate::judgment::{is_affirmative, judgment_confidence, strip_question};
use crate::similarity::cosine_similarity;

/// Scores frames by cosine similarity of image and query embeddings.
///
/// Negative similarities score 0. The embedding of the most recent query
/// is kept so a search embeds its query once.
pub struct EmbeddingScorer {
    client: Arc<MlClient>,
    query_cache: Mutex<Option<(String, Arc<Vec<f32>>)>>,
}

impl EmbeddingScorer {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self {
            client,
            query_cache: Mutex::new(None),
        }
    }

    async fn query_embedding(&self, query: &str) -> MlResult<Arc<Vec<f32>>> {
        if let Some((cached_query, embedding)) = self.query_cache.lock().await.as_ref() {
            if cached_query == query {
                return Ok(Arc::clone(embedding));
            }
        }

        let embedding = Arc::new(self.client.embed_text(query).await?);
        *self.query_cache.lock().await = Some((query.to_string(), Arc::clone(&embedding)));
        Ok(embedding)
    }
}

#[async_trait]
impl RelevanceScorer<FrameImage> for EmbeddingScorer {
    async fn score(&self, image: &FrameImage, query: &str) -> CollaboratorResult<Relevance> {
        let query_embedding = self.query_embedding(query).await?;
        let encoded = encode_jpeg_base64(image)?;
        let image_embedding = self.client.embed_image(&encoded).await?;

        let similarity = cosine_similarity(&query_embedding, &image_embedding)?;
        Ok(Relevance::new(similarity.clamp(0.0, 1.0)))
    }
}

/// Scores frames by asking the model whether the frame shows the query.
///
/// The answer text becomes the frame's caption.
pub struct JudgmentScorer {
    client: Arc<MlClient>,
}

impl JudgmentScorer {
    pub fn new(client: Arc<MlClient>) -> Self {
        Self { client }
    }

    pub fn question_for(query: &str) -> String {
        format!("Does this image show {}?", query)
    }
}

#[async_trait]
impl RelevanceScorer<FrameImage> for JudgmentScorer {
    async fn score(&self, image: &FrameImage, query: &str) -> CollaboratorResult<Relevance> {
        let question = Self::question_for(query);
        let encoded = encode_jpeg_base64(image)?;
        let raw_answer = self.client.ask(&encoded, &question).await?;
        let answer = strip_question(&raw_answer, &question);

        let score = if is_affirmative(answer, query) {
            judgment_confidence(answer)
        } else {
            0.0
        };

        debug!(query, answer, score, "Judged frame");

        let relevance = Relevance::new(score);
        Ok(if answer.is_empty() {
            relevance
        } else {
            relevance.with_caption(answer)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MlClientConfig;
    use image::RgbImage;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<MlClient> {
        Arc::new(
            MlClient::new(MlClientConfig {
                base_url: server.uri(),
                timeout: Duration::from_secs(5),
                max_retries: 0,
            })
            .unwrap(),
        )
    }

    fn frame() -> FrameImage {
        FrameImage::new(RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 10])))
    }

    async fn mount_embedding(server: &MockServer, endpoint: &str, embedding: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "embedding": embedding })),
            )
            .mount(server)
            .await;
    }

    async fn mount_answer(server: &MockServer, answer: &str) {
        Mock::given(method("POST"))
            .and(path("/vqa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": answer })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_embedding_scorer_embeds_query_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed/text"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "embedding": [1.0, 0.0] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_embedding(&server, "/embed/image", serde_json::json!([1.0, 0.0])).await;

        let scorer = EmbeddingScorer::new(client_for(&server));
        let first = scorer.score(&frame(), "a field").await.unwrap();
        let second = scorer.score(&frame(), "a field").await.unwrap();

        assert!((first.score - 1.0).abs() < 1e-6);
        assert_eq!(first, second);
        assert!(first.caption.is_none());
    }

    #[tokio::test]
    async fn test_embedding_scorer_clamps_negative_similarity() {
        let server = MockServer::start().await;
        mount_embedding(&server, "/embed/text", serde_json::json!([1.0, 0.0])).await;
        mount_embedding(&server, "/embed/image", serde_json::json!([-1.0, 0.0])).await;

        let scorer = EmbeddingScorer::new(client_for(&server));
        let relevance = scorer.score(&frame(), "a field").await.unwrap();
        assert_eq!(relevance.score, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_scorer_dimension_mismatch() {
        let server = MockServer::start().await;
        mount_embedding(&server, "/embed/text", serde_json::json!([1.0, 0.0])).await;
        mount_embedding(&server, "/embed/image", serde_json::json!([1.0, 0.0, 0.0])).await;

        let scorer = EmbeddingScorer::new(client_for(&server));
        let err = scorer.score(&frame(), "a field").await.unwrap_err();
        assert!(err.to_string().contains("dimensions"));
    }

    #[tokio::test]
    async fn test_judgment_scorer_affirmative() {
        let server = MockServer::start().await;
        mount_answer(&server, "Does this image show a dog? yes, clearly").await;

        let scorer = JudgmentScorer::new(client_for(&server));
        let relevance = scorer.score(&frame(), "a dog").await.unwrap();

        assert!((relevance.score - 1.0).abs() < 1e-9);
        assert_eq!(relevance.caption.as_deref(), Some("yes, clearly"));
    }

    #[tokio::test]
    async fn test_judgment_scorer_negative() {
        let server = MockServer::start().await;
        mount_answer(&server, "no").await;

        let scorer = JudgmentScorer::new(client_for(&server));
        let relevance = scorer.score(&frame(), "a dog").await.unwrap();

        assert_eq!(relevance.score, 0.0);
        assert_eq!(relevance.caption.as_deref(), Some("no"));
    }

    #[test]
    fn test_question_for() {
        assert_eq!(
            JudgmentScorer::question_for("a red car"),
            "Does this image show a red car?"
        );
    }
}
