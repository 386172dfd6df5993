//! Style transformation module.

mod gemini;
mod transformer;
mod types;

pub use gemini::{GeminiTransformer, GeminiTransformerBuilder, GHIBLI_INSTRUCTION};
pub use transformer::StyleTransformer;
pub use types::{first_image, ImageFormat, ResponseFragment, StyleOutcome, StyledImage};
