use std::{
    fs,
    path::{Path, PathBuf},
};

use checklist_agent::{GeminiEditor, GeminiSettings};
use checklist_core::editor::{EditRequest, ImageEditor};
use color_eyre::Result;
use tracing::info;

use crate::config::Config;

/// Execute the one-shot image-edit subcommand. Failures are surfaced to the
/// caller as human-readable messages; the checklist grid is never involved.
pub async fn run(
    image: PathBuf,
    prompt: Vec<String>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let prompt_text = prompt.join(" ");
    if prompt_text.trim().is_empty() {
        color_eyre::eyre::bail!("no edit instruction given");
    }

    let settings = resolve_gemini_settings(config).ok_or_else(|| {
        color_eyre::eyre::eyre!(
            "no Gemini API key configured; set [gemini] api_key in the config file \
             or the CHECKLIST_GEMINI_API_KEY environment variable"
        )
    })?;
    let editor = GeminiEditor::new(settings).map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    info!("image edit invoked (provider: {})", editor.name());

    let bytes = fs::read(&image)?;
    let request = EditRequest {
        image: bytes,
        mime_type: mime_for(&image)?.to_string(),
        prompt: prompt_text,
    };
    let edited = editor
        .edit(request)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;

    let out = output.unwrap_or_else(|| default_output(&image));
    fs::write(&out, &edited.image)?;
    println!("Edited image written to {}", out.display());
    Ok(())
}

/// Resolve provider settings from config, falling back to the environment.
fn resolve_gemini_settings(config: &Config) -> Option<GeminiSettings> {
    let key = config
        .gemini
        .as_ref()
        .and_then(|c| c.api_key.clone())
        .or_else(|| std::env::var("CHECKLIST_GEMINI_API_KEY").ok())
        .or_else(|| std::env::var("GEMINI_API_KEY").ok());

    key.map(|api_key| {
        let mut settings = GeminiSettings::new(api_key);
        if let Some(model) = config.gemini.as_ref().and_then(|c| c.model.clone()) {
            settings.model = model;
        }
        settings.api_base = config.gemini.as_ref().and_then(|c| c.endpoint.clone());
        settings
    })
}

fn mime_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        _ => color_eyre::eyre::bail!(
            "unsupported image type: {} (expected png or jpeg)",
            path.display()
        ),
    }
}

fn default_output(image: &Path) -> PathBuf {
    image.with_extension("edited.png")
}
