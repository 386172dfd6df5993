//! Style transformer trait.

use crate::error::Result;
use crate::transform::types::StyleOutcome;
use async_trait::async_trait;

/// Trait for the external style transformation collaborator.
///
/// One call per attempt: the implementation sends the encoded photo, awaits
/// the single response, and reports either an image, an explicit empty
/// outcome, or a typed error. No retries, no caching; repeated calls with
/// the same payload make no consistency promise.
#[async_trait]
pub trait StyleTransformer: Send + Sync {
    /// Transforms one photo, given its base64 payload and media type.
    async fn transform(&self, encoded_payload: &str, mime_type: &str) -> Result<StyleOutcome>;

    /// Returns the name of this transformer for display.
    fn name(&self) -> &str;

    /// Checks if the transformer is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}
