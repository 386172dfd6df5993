//! Session state and the transformation request orchestrator.
//!
//! One controller owns the three pieces of shell state (current upload,
//! current generation state, current user-facing message) and mutates them
//! only in response to discrete events: a file uploaded, generate triggered,
//! a response received. Shells render from the accessors and never observe
//! a partially-populated state.

use crate::intake::UploadedFile;
use crate::transform::{StyleOutcome, StyleTransformer, StyledImage};
use std::path::Path;

/// Notice shown when the uploaded content is not an image.
pub const VALIDATION_NOTICE: &str = "Please upload an image file.";

/// Message shown when the model answered but produced no image. Must stay
/// distinct from [`GENERIC_ERROR_MESSAGE`] so the user can tell a decline
/// from a transport fault.
pub const EMPTY_RESULT_MESSAGE: &str =
    "The AI could not generate an image. Please try another photo.";

/// Message shown for any transport or API fault. Raw fault detail is logged,
/// never shown.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while generating the image. Please try again.";

/// Default filename for the download affordance.
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "ghibli-image.jpg";

/// State of one orchestration attempt.
///
/// `Idle` is both initial and terminal between attempts. There is no retry
/// within an attempt; a failed attempt requires an explicit re-trigger.
#[derive(Debug, Clone, Default)]
pub enum GenerationState {
    /// No attempt outstanding and no result displayed.
    #[default]
    Idle,
    /// A request is in flight. Shells should disable the trigger control.
    Requesting,
    /// The attempt produced a transformed image.
    Succeeded(StyledImage),
    /// The attempt completed but the model produced no image.
    SucceededEmpty,
    /// The attempt failed; carries the user-facing message only.
    Failed(String),
}

impl GenerationState {
    /// Returns true while a request is outstanding.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Requesting)
    }
}

/// The controller driving intake and orchestration for one shell.
#[derive(Default)]
pub struct Session {
    file: Option<UploadedFile>,
    state: GenerationState,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a freshly-intaken upload.
    ///
    /// Always clears any displayed result and error first: a new upload
    /// never shows stale generation output. The previous upload's preview
    /// bytes are released here.
    pub fn upload(&mut self, file: UploadedFile) {
        self.state = GenerationState::Idle;
        self.file = Some(file);
    }

    /// Discards the current upload and any result.
    pub fn reset(&mut self) {
        self.state = GenerationState::Idle;
        self.file = None;
    }

    /// Drives one request/response cycle against the transformer.
    ///
    /// With no upload present this is a no-op; the in-progress state is
    /// never entered. Otherwise the prior result and error are cleared, the
    /// single call is awaited, and exactly one terminal state is installed.
    /// Every exit path leaves the session out of `Requesting`: all faults
    /// are caught here and folded into `Failed`, so no error propagates to
    /// the shell.
    pub async fn generate(&mut self, transformer: &dyn StyleTransformer) {
        let Some(file) = &self.file else {
            return;
        };

        self.state = GenerationState::Requesting;

        let outcome = transformer
            .transform(&file.encoded_payload, &file.mime_type)
            .await;

        self.state = match outcome {
            Ok(StyleOutcome::Image(image)) => GenerationState::Succeeded(image),
            Ok(StyleOutcome::Empty) => GenerationState::SucceededEmpty,
            Err(e) => {
                tracing::error!(error = %e, transformer = transformer.name(), "generation failed");
                GenerationState::Failed(GENERIC_ERROR_MESSAGE.to_string())
            }
        };
    }

    /// The current upload, if any.
    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// The current generation state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Returns true while a request is outstanding. Advisory guard: shells
    /// disable the trigger control while set.
    pub fn is_in_progress(&self) -> bool {
        self.state.is_in_progress()
    }

    /// The transformed image from the last attempt, if it succeeded.
    pub fn result(&self) -> Option<&StyledImage> {
        match &self.state {
            GenerationState::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    /// The user-facing message for the last attempt, if it ended without an
    /// image. Empty-result and failure produce different strings.
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            GenerationState::SucceededEmpty => Some(EMPTY_RESULT_MESSAGE),
            GenerationState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Saves the current result to `path`, the download affordance.
    ///
    /// Returns false when there is no result to save.
    pub fn download_to(&self, path: impl AsRef<Path>) -> crate::Result<bool> {
        match self.result() {
            Some(image) => {
                image.save(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
