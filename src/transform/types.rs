//! Core types for the transformation response model.

use crate::error::{GhiblifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to parse a format from a MIME type string.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// One unit of a multi-part response from the generation API.
///
/// The API returns an ordered list of fragments; each carries either prose
/// or inline binary image data. Extraction is a find-first-matching-variant
/// operation independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFragment {
    /// A text fragment (commentary, refusal prose, etc.).
    Text(String),
    /// An inline image fragment, base64-encoded.
    InlineImage {
        /// Base64 payload, no data-URI prefix.
        data: String,
        /// Media type of the decoded payload.
        mime_type: String,
    },
}

impl ResponseFragment {
    /// Returns the inline image payload if this fragment carries one.
    pub fn as_image(&self) -> Option<(&str, &str)> {
        match self {
            Self::InlineImage { data, mime_type } => Some((data, mime_type)),
            Self::Text(_) => None,
        }
    }
}

/// Scans fragments in order and returns the first one carrying image data.
///
/// Fragments before the first image (typically text) are skipped; anything
/// after it is ignored. Returns `None` when no fragment carries an image.
pub fn first_image(fragments: &[ResponseFragment]) -> Option<(&str, &str)> {
    fragments.iter().find_map(ResponseFragment::as_image)
}

/// Outcome of one transformation attempt that reached the API and got a
/// well-formed response.
///
/// A response without any image fragment is a distinct outcome, not a
/// failure: the model answered but declined to produce an image.
#[derive(Debug, Clone)]
pub enum StyleOutcome {
    /// The response carried an image.
    Image(StyledImage),
    /// The response carried no image fragment.
    Empty,
}

impl StyleOutcome {
    /// Builds the outcome from an ordered fragment list, decoding the first
    /// image fragment if present.
    pub fn from_fragments(fragments: &[ResponseFragment]) -> Result<Self> {
        match first_image(fragments) {
            Some((data, mime_type)) => {
                Ok(Self::Image(StyledImage::from_base64(data, mime_type)?))
            }
            None => Ok(Self::Empty),
        }
    }
}

/// A transformed image with its decoded bytes.
#[derive(Debug, Clone)]
#[must_use = "styled image should be saved or rendered"]
pub struct StyledImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format, from the response MIME type or magic bytes.
    pub format: ImageFormat,
}

impl StyledImage {
    /// Decodes a base64 payload into a styled image.
    ///
    /// The claimed MIME type wins when recognized; otherwise the format is
    /// sniffed from magic bytes, defaulting to PNG.
    pub fn from_base64(data: &str, mime_type: &str) -> Result<Self> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| GhiblifyError::Decode(e.to_string()))?;

        let format = ImageFormat::from_mime_type(mime_type)
            .or_else(|| ImageFormat::from_magic_bytes(&bytes))
            .unwrap_or_default();

        Ok(Self {
            data: bytes,
            format,
        })
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL for in-shell rendering.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.to_base64()
        )
    }
}
