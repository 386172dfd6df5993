//! Upload intake: turning a user-selected photo into a canonical record.
//!
//! Intake validates that the candidate is an image, reads its bytes exactly
//! once, and derives both the base64 payload sent to the API and the local
//! preview bytes from that single read. The two are never mutated
//! independently, so the payload always decodes back to the previewed
//! content.

use crate::error::{GhiblifyError, Result};
use crate::transform::ImageFormat;
use base64::Engine;
use std::path::Path;

/// A validated, encoded upload.
///
/// Created on successful intake and replaced wholesale on the next upload.
/// Dropping the record releases the preview bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename, display-only.
    pub name: String,
    /// Source media type. Always starts with `image/`.
    pub mime_type: String,
    /// Byte length of the source content, display-only.
    pub size_bytes: u64,
    /// The source bytes, kept for on-screen rendering of the original.
    pub preview: Vec<u8>,
    /// Base64 of `preview`, no data-URI prefix. This is the exact payload
    /// shape sent to the generation API.
    pub encoded_payload: String,
}

impl UploadedFile {
    /// Builds a record from in-memory bytes, for shells that already hold
    /// the file content.
    ///
    /// Rejects any `mime_type` that does not start with `image/` without
    /// producing a record.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(GhiblifyError::Validation(mime_type));
        }

        let encoded_payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(Self {
            name: name.into(),
            mime_type,
            size_bytes: bytes.len() as u64,
            preview: bytes,
            encoded_payload,
        })
    }

    /// Builds a record from an already-encoded payload, as handed over by
    /// shells that read files into data URLs.
    ///
    /// Any `data:<mime>;base64,` prefix is stripped first; the stored
    /// payload is always bare base64. The preview bytes are decoded from
    /// the same payload, keeping the two byte-for-byte in sync.
    pub fn from_encoded(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        encoded: &str,
    ) -> Result<Self> {
        let payload = strip_data_url_prefix(encoded);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| GhiblifyError::Decode(e.to_string()))?;
        Self::from_bytes(name, mime_type, bytes)
    }

    /// Reads a photo from disk, sniffing the media type from magic bytes.
    ///
    /// One asynchronous read per call; a later intake simply supersedes the
    /// record built here.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let mime_type = match ImageFormat::from_magic_bytes(&bytes) {
            Some(format) => format.mime_type().to_string(),
            None => {
                return Err(GhiblifyError::Validation(format!(
                    "{} does not look like an image",
                    path.display()
                )))
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(name, mime_type, bytes)
    }
}

/// Strips a `data:<mime>;base64,` scheme prefix from a pre-encoded payload.
///
/// Shells that encode via data URLs hand over the full URL; the API wants
/// only the payload after the comma. Plain base64 passes through unchanged.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    if encoded.starts_with("data:") {
        match encoded.split_once(',') {
            Some((_, payload)) => payload,
            None => encoded,
        }
    } else {
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_rejects_non_image_mime() {
        let result = UploadedFile::from_bytes("notes.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(matches!(result, Err(GhiblifyError::Validation(_))));
    }

    #[test]
    fn test_accepts_any_image_subtype() {
        for mime in ["image/png", "image/jpeg", "image/webp", "image/gif"] {
            let result = UploadedFile::from_bytes("photo", mime, vec![0xFF]);
            assert!(result.is_ok(), "{mime} should be accepted");
        }
    }

    #[test]
    fn test_payload_round_trips_to_source_bytes() {
        let bytes = vec![0x00, 0x01, 0xFE, 0xFF, 0x42];
        let file = UploadedFile::from_bytes("photo.png", "image/png", bytes.clone()).unwrap();

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&file.encoded_payload)
            .unwrap();
        assert_eq!(decoded, bytes);
        assert_eq!(file.preview, bytes);
        assert_eq!(file.size_bytes, 5);
    }

    #[test]
    fn test_from_encoded_strips_data_url_prefix() {
        let file = UploadedFile::from_encoded(
            "photo.jpg",
            "image/jpeg",
            "data:image/jpeg;base64,Zm9v",
        )
        .unwrap();
        assert_eq!(file.encoded_payload, "Zm9v");
        assert_eq!(file.preview, b"foo");

        // Bare base64 works the same
        let file = UploadedFile::from_encoded("photo.jpg", "image/jpeg", "Zm9v").unwrap();
        assert_eq!(file.encoded_payload, "Zm9v");
    }

    #[test]
    fn test_from_encoded_rejects_non_image_mime() {
        let result = UploadedFile::from_encoded("doc.pdf", "application/pdf", "Zm9v");
        assert!(matches!(result, Err(GhiblifyError::Validation(_))));
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(
            strip_data_url_prefix("data:image/png;base64,iVBORw0KGgo="),
            "iVBORw0KGgo="
        );
        assert_eq!(strip_data_url_prefix("iVBORw0KGgo="), "iVBORw0KGgo=");
        // Malformed data URL with no comma is passed through untouched
        assert_eq!(strip_data_url_prefix("data:image/png"), "data:image/png");
    }

    #[tokio::test]
    async fn test_from_path_sniffs_png() {
        let dir = std::env::temp_dir();
        let path = dir.join("ghiblify-intake-test.png");
        tokio::fs::write(&path, PNG_MAGIC).await.unwrap();

        let file = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.name, "ghiblify-intake-test.png");
        assert_eq!(file.size_bytes, PNG_MAGIC.len() as u64);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_from_path_rejects_non_image_content() {
        let dir = std::env::temp_dir();
        let path = dir.join("ghiblify-intake-test.txt");
        tokio::fs::write(&path, b"just some text, long enough to sniff")
            .await
            .unwrap();

        let result = UploadedFile::from_path(&path).await;
        assert!(matches!(result, Err(GhiblifyError::Validation(_))));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
