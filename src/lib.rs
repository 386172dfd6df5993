#![warn(missing_docs)]
//! Ghiblify - transform photos into the Studio Ghibli art style.
//!
//! This crate wraps one outbound call to the Gemini image API: a photo goes
//! in, a stylized rendition comes back. The library splits into upload
//! intake (validate, encode, preview), a transformer client, and a session
//! controller holding the explicit generation state machine that any shell
//! (CLI, web, desktop) can render from.
//!
//! # Quick Start
//!
//! ```no_run
//! use ghiblify::{GeminiTransformer, Session, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> ghiblify::Result<()> {
//!     let transformer = GeminiTransformer::builder().build()?;
//!     let mut session = Session::new();
//!
//!     session.upload(UploadedFile::from_path("photo.jpg").await?);
//!     session.generate(&transformer).await;
//!
//!     if let Some(image) = session.result() {
//!         image.save("ghibli-image.jpg")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Outcome model
//!
//! One attempt ends in exactly one of three observable states: an image, an
//! explicit empty result (the model answered without producing an image),
//! or a failure carrying a generic user-facing message. Faults never escape
//! the session; shells only read the terminal state.

mod error;
pub mod intake;
pub mod session;
pub mod transform;

pub use error::{GhiblifyError, Result};
pub use intake::{strip_data_url_prefix, UploadedFile};
pub use session::{
    GenerationState, Session, DEFAULT_DOWNLOAD_FILENAME, EMPTY_RESULT_MESSAGE,
    GENERIC_ERROR_MESSAGE, VALIDATION_NOTICE,
};
pub use transform::{
    GeminiTransformer, GeminiTransformerBuilder, ImageFormat, ResponseFragment, StyleOutcome,
    StyleTransformer, StyledImage, GHIBLI_INSTRUCTION,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GhiblifyError, Result};
    pub use crate::intake::UploadedFile;
    pub use crate::session::{GenerationState, Session};
    pub use crate::transform::{GeminiTransformer, StyleTransformer, StyledImage};
}
