use async_trait::async_trait;

use crate::types::Detection;

/// Seam between the HTTP layer and the upstream emotion classifier.
///
/// Implementations fold every failure into the returned [`Detection`], so
/// no error value ever crosses into the request handlers.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, text: &str) -> Detection;
}
