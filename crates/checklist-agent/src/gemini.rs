use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use checklist_core::editor::{
    EditRequest, EditedImage, EditorError, ImageEditor, MAX_IMAGE_BYTES,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini image editor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
}

impl GeminiSettings {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
        }
    }
}

/// Gemini-backed image editor using the `generateContent` endpoint: the
/// source image goes up as an inline base64 part next to the text prompt,
/// and the first inline-data part of the reply comes back as the result.
pub struct GeminiEditor {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiEditor {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(EditorError::MissingApiKey.into());
        }
        Ok(Self {
            client: reqwest::Client::new(),
            settings,
        })
    }

    fn endpoint(&self) -> String {
        let base = self
            .settings
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.settings.model)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.settings.api_key)
                .map_err(|_| EditorError::MissingApiKey)?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip_all, fields(editor = "gemini", model = %self.settings.model))]
    async fn edit(&self, request: EditRequest) -> Result<EditedImage> {
        if request.image.len() > MAX_IMAGE_BYTES {
            return Err(EditorError::ImageTooLarge {
                size: request.image.len(),
            }
            .into());
        }

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: request.mime_type.clone(),
                            data: BASE64.encode(&request.image),
                        }),
                    },
                    Part {
                        text: Some(request.prompt.clone()),
                        inline_data: None,
                    },
                ],
            }],
        };

        let payload: GenerateResponse = self
            .client
            .post(self.endpoint())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|err| EditorError::Request {
                reason: err.to_string(),
            })?
            .error_for_status()
            .map_err(|err| EditorError::Request {
                reason: err.to_string(),
            })?
            .json()
            .await
            .map_err(|err| EditorError::Request {
                reason: err.to_string(),
            })?;

        let inline = first_inline_image(payload).ok_or(EditorError::NoImageReturned)?;
        let image = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|err| EditorError::Request {
                reason: format!("invalid base64 in model response: {err}"),
            })?;
        Ok(EditedImage {
            image,
            mime_type: inline.mime_type,
        })
    }
}

/// First inline-data part across candidates; text parts are commentary.
fn first_inline_image(payload: GenerateResponse) -> Option<InlineData> {
    payload
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_model_and_base() {
        let settings = GeminiSettings::new("key".into());
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.api_base, None);
    }

    #[test]
    fn endpoint_uses_the_base_override() {
        let mut settings = GeminiSettings::new("key".into());
        settings.api_base = Some("https://example.test/v1beta/".into());
        let editor = GeminiEditor::new(settings).expect("editor");
        assert_eq!(
            editor.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn blank_api_key_is_rejected_at_construction() {
        let err = GeminiEditor::new(GeminiSettings::new("  ".into()))
            .err()
            .expect("construction should fail");
        let err = err.downcast::<EditorError>().expect("typed editor error");
        assert_eq!(err, EditorError::MissingApiKey);
    }

    #[test]
    fn request_body_carries_inline_image_then_prompt() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".into(),
                            data: BASE64.encode(b"pixels"),
                        }),
                    },
                    Part {
                        text: Some("add a hat".into()),
                        inline_data: None,
                    },
                ],
            }],
        };
        let value = serde_json::to_value(&body).expect("serialize");
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["text"], "add a hat");
        // Absent fields are omitted entirely, not serialized as null.
        assert!(parts[0].get("text").is_none());
    }

    #[test]
    fn response_extraction_finds_the_inline_part() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"text": "Here is your edit."},
                            {"inlineData": {"mimeType": "image/png", "data": "cGl4ZWxz"}}
                        ]
                    }
                }]
            }"#,
        )
        .expect("parse");
        let inline = first_inline_image(payload).expect("inline part");
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(BASE64.decode(inline.data).expect("decode"), b"pixels");
    }

    #[test]
    fn text_only_responses_have_no_image() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "cannot comply"}]}}]}"#,
        )
        .expect("parse");
        assert!(first_inline_image(payload).is_none());
    }

    #[tokio::test]
    async fn oversized_images_are_rejected_before_any_network_call() {
        let editor = GeminiEditor::new(GeminiSettings::new("key".into())).expect("editor");
        let err = editor
            .edit(EditRequest {
                image: vec![0; MAX_IMAGE_BYTES + 1],
                mime_type: "image/png".into(),
                prompt: "shrink it".into(),
            })
            .await
            .expect_err("oversized image should be rejected");
        let err = err.downcast::<EditorError>().expect("typed editor error");
        assert_eq!(
            err,
            EditorError::ImageTooLarge {
                size: MAX_IMAGE_BYTES + 1
            }
        );
    }
}
