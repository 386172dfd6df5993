//! Gemini (Google) style transformation client.

use crate::error::{GhiblifyError, Result};
use crate::transform::transformer::StyleTransformer;
use crate::transform::types::{ResponseFragment, StyleOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The fixed stylistic directive sent with every photo.
pub const GHIBLI_INSTRUCTION: &str = "Transform this image into the Studio Ghibli art style. \
    Ensure the output has a painterly, whimsical, and nostalgic feel characteristic of their films.";

const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builder for [`GeminiTransformer`].
#[derive(Debug, Clone, Default)]
pub struct GeminiTransformerBuilder {
    api_key: Option<String>,
    model: Option<String>,
}

impl GeminiTransformerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the transformer, resolving the API key.
    ///
    /// A missing key is fatal here: no transformer is constructed and no
    /// partial operation is possible.
    pub fn build(self) -> Result<GeminiTransformer> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                GhiblifyError::Auth("GOOGLE_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiTransformer {
            client: reqwest::Client::new(),
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

/// Gemini-backed style transformer.
pub struct GeminiTransformer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiTransformer {
    /// Creates a new [`GeminiTransformerBuilder`].
    pub fn builder() -> GeminiTransformerBuilder {
        GeminiTransformerBuilder::new()
    }

    async fn transform_impl(&self, encoded_payload: &str, mime_type: &str) -> Result<StyleOutcome> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = GeminiRequest::for_photo(encoded_payload, mime_type);

        tracing::debug!(model = %self.model, mime_type, "sending transformation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let fragments = gemini_response.into_fragments();

        tracing::debug!(fragments = fragments.len(), "response received");

        StyleOutcome::from_fragments(&fragments)
    }
}

#[async_trait]
impl StyleTransformer for GeminiTransformer {
    async fn transform(&self, encoded_payload: &str, mime_type: &str) -> Result<StyleOutcome> {
        self.transform_impl(encoded_payload, mime_type).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/{}", API_BASE, self.model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(GhiblifyError::Auth("Invalid API key".into())),
            s if !(200..300).contains(&s) => Err(GhiblifyError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

fn parse_error(status: u16, text: &str) -> GhiblifyError {
    if status == 401 || status == 403 {
        return GhiblifyError::Auth(text.to_string());
    }
    GhiblifyError::Api {
        status,
        message: text.to_string(),
    }
}

// Request/Response wire types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    /// Photo part first, then the fixed instruction, requesting both image
    /// and text modalities back.
    fn for_photo(encoded_payload: &str, mime_type: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiRequestPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: mime_type.to_string(),
                            data: encoded_payload.to_string(),
                        },
                    },
                    GeminiRequestPart::Text {
                        text: GHIBLI_INSTRUCTION.to_string(),
                    },
                ],
            }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<GeminiInlineData>,
}

impl GeminiResponse {
    /// Flattens the first candidate's parts into ordered fragments. An
    /// absent candidate or content is an empty fragment list, not an error.
    fn into_fragments(self) -> Vec<ResponseFragment> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| {
                        if let Some(inline) = part.inline_data {
                            Some(ResponseFragment::InlineImage {
                                data: inline.data,
                                mime_type: inline.mime_type,
                            })
                        } else {
                            part.text.map(ResponseFragment::Text)
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_explicit_key() {
        let transformer = GeminiTransformerBuilder::new().api_key("test-key").build();
        assert!(transformer.is_ok());
        assert_eq!(transformer.unwrap().model, DEFAULT_MODEL);
    }

    #[test]
    fn test_builder_model_override() {
        let transformer = GeminiTransformer::builder()
            .api_key("test-key")
            .model("gemini-3-pro-image-preview")
            .build()
            .unwrap();
        assert_eq!(transformer.model, "gemini-3-pro-image-preview");
    }

    #[test]
    fn test_request_construction() {
        let req = GeminiRequest::for_photo("aGVsbG8=", "image/png");

        // One content entry, image part first, instruction second
        assert_eq!(req.contents.len(), 1);
        assert_eq!(req.contents[0].parts.len(), 2);
        assert!(matches!(
            &req.contents[0].parts[0],
            GeminiRequestPart::InlineData { inline_data }
                if inline_data.data == "aGVsbG8=" && inline_data.mime_type == "image/png"
        ));
        assert!(matches!(
            &req.contents[0].parts[1],
            GeminiRequestPart::Text { text } if text == GHIBLI_INSTRUCTION
        ));
        assert_eq!(
            req.generation_config.response_modalities,
            vec!["IMAGE", "TEXT"]
        );
    }

    #[test]
    fn test_request_body_matches_rest_wire_shape() {
        let req = GeminiRequest::for_photo("Zm9v", "image/png");
        let json = serde_json::to_value(&req).unwrap();

        // The REST API wants contents as an array of Content objects and
        // the modalities under generationConfig, not the SDK argument shape
        assert!(json["contents"].is_array());
        assert!(json.get("config").is_none());
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );

        let part = &json["contents"][0]["parts"][0];
        assert!(part.get("inline_data").is_none());
        assert_eq!(part["inlineData"]["mimeType"], "image/png");
        assert_eq!(part["inlineData"]["data"], "Zm9v");
        assert_eq!(json["contents"][0]["parts"][1]["text"], GHIBLI_INSTRUCTION);
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let req = GeminiRequest::for_photo("aGVsbG8=", "image/png");
        let json = serde_json::to_value(&req).unwrap();

        assert!(json.get("generation_config").is_none());
        assert!(json.get("generationConfig").is_some());

        let part = &json["contents"][0]["parts"][0];
        assert!(part.get("inline_data").is_none());
        assert_eq!(part["inlineData"]["mimeType"], "image/png");
    }

    #[test]
    fn test_response_into_fragments_preserves_order() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image:"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "Zm9v"}}
                    ]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let fragments = resp.into_fragments();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], ResponseFragment::Text("Here is your image:".into()));
        assert_eq!(
            fragments[1],
            ResponseFragment::InlineImage {
                data: "Zm9v".into(),
                mime_type: "image/jpeg".into(),
            }
        );
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_fragments().is_empty());

        let resp: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert!(resp.into_fragments().is_empty());
    }

    #[test]
    fn test_parse_error_auth() {
        assert!(matches!(parse_error(403, "forbidden"), GhiblifyError::Auth(_)));
        assert!(matches!(
            parse_error(500, "boom"),
            GhiblifyError::Api { status: 500, .. }
        ));
    }
}
