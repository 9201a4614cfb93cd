use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Largest source image accepted for an edit, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Failure conditions an image-edit provider can report. Everything else
/// (transport, decoding) travels as a generic request failure so callers can
/// show one human-readable message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("API key is missing")]
    MissingApiKey,
    #[error("image is {size} bytes; the upload limit is {MAX_IMAGE_BYTES}")]
    ImageTooLarge { size: usize },
    #[error("the model processed the request but did not return an image")]
    NoImageReturned,
    #[error("image edit request failed: {reason}")]
    Request { reason: String },
}

/// One image-edit invocation: the source image plus an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub prompt: String,
}

/// Edited image handed back by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedImage {
    pub image: Vec<u8>,
    pub mime_type: String,
}

/// Contract for any image-edit provider (Gemini, stub). Providers are fully
/// isolated from checklist state; their failures surface only to their own
/// caller.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Short name used for logging and UI.
    fn name(&self) -> &'static str;

    /// Apply `request.prompt` to `request.image` and return the result.
    async fn edit(&self, request: EditRequest) -> Result<EditedImage>;
}

/// Stub provider that hands the source image back untouched. Useful for
/// tests and offline smoke checks.
pub struct PassthroughEditor;

#[async_trait]
impl ImageEditor for PassthroughEditor {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn edit(&self, request: EditRequest) -> Result<EditedImage> {
        if request.image.len() > MAX_IMAGE_BYTES {
            return Err(EditorError::ImageTooLarge {
                size: request.image.len(),
            }
            .into());
        }
        Ok(EditedImage {
            image: request.image,
            mime_type: request.mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_editor_returns_the_source_image() {
        let editor = PassthroughEditor;
        let response = editor
            .edit(EditRequest {
                image: vec![1, 2, 3],
                mime_type: "image/png".into(),
                prompt: "make it pop".into(),
            })
            .await
            .expect("passthrough edit should succeed");

        assert_eq!(response.image, vec![1, 2, 3]);
        assert_eq!(response.mime_type, "image/png");
    }

    #[tokio::test]
    async fn passthrough_editor_rejects_oversized_images() {
        let editor = PassthroughEditor;
        let err = editor
            .edit(EditRequest {
                image: vec![0; MAX_IMAGE_BYTES + 1],
                mime_type: "image/png".into(),
                prompt: "shrink".into(),
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
