use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    db::content,
    error::{AppError, AppResult},
    models::{Content, LAYER_COUNT},
    services::{
        extract::DocumentExtractor,
        generator::{GenerationRequest, TextGenerator},
    },
};

pub const TUTOR_SYSTEM_PROMPT: &str = "You are a helpful tutor.";

/// Prompt prefixes from simplest to most expert
pub const LAYER_PROMPTS: [&str; LAYER_COUNT] = [
    "Explain this text to a child in very simple terms:\n\n",
    "Explain this text to a high-school student:\n\n",
    "Explain this text to a college student, including definitions:\n\n",
    "Explain this text to an expert, with technical detail:\n\n",
];

const LAYER_TEMPERATURE: f32 = 0.7;

/// What the student submitted for distillation
#[derive(Debug, Clone, Default)]
pub struct DistillInput {
    pub text: Option<String>,
    /// Raw PDF bytes; takes precedence over `text` when present
    pub document: Option<Vec<u8>>,
}

/// Works out the text to distill, extracting it from the document if one was sent
///
/// Fails with `InvalidInput` before any external call when there is nothing
/// to work with.
pub async fn resolve_raw_text(
    input: DistillInput,
    extractor: Arc<dyn DocumentExtractor>,
) -> AppResult<String> {
    let raw_text = match input.document.filter(|bytes| !bytes.is_empty()) {
        Some(document) => {
            let extracted = tokio::task::spawn_blocking(move || extractor.extract(&document))
                .await
                .map_err(|e| AppError::Extraction(e.to_string()))??;
            extracted.trim().to_string()
        }
        None => input.text.unwrap_or_default().trim().to_string(),
    };

    if raw_text.is_empty() {
        return Err(AppError::InvalidInput(
            "Please provide text or upload a PDF".to_string(),
        ));
    }

    Ok(raw_text)
}

/// Generates all explanation layers, or none
///
/// The first failing call aborts the whole request; its cause is logged and
/// surfaced as a generic generation failure. No retry is attempted.
pub async fn generate_layers(
    generator: &dyn TextGenerator,
    raw_text: &str,
) -> AppResult<[String; LAYER_COUNT]> {
    let mut layers: [String; LAYER_COUNT] = Default::default();

    for (index, prefix) in LAYER_PROMPTS.iter().enumerate() {
        let request = GenerationRequest::new(format!("{}{}", prefix, raw_text))
            .with_system(TUTOR_SYSTEM_PROMPT)
            .with_temperature(LAYER_TEMPERATURE);

        layers[index] = generator.generate(&request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                generator = generator.name(),
                layer = index,
                "Layer generation failed"
            );
            AppError::Generation
        })?;
    }

    Ok(layers)
}

/// Distills a text into four layers and stores them as one content record
pub async fn distill(
    pool: &SqlitePool,
    generator: &dyn TextGenerator,
    extractor: Arc<dyn DocumentExtractor>,
    student_id: i64,
    input: DistillInput,
) -> AppResult<Content> {
    let raw_text = resolve_raw_text(input, extractor).await?;

    tracing::info!(
        student_id,
        chars = raw_text.chars().count(),
        "Distilling content"
    );

    let layers = generate_layers(generator, &raw_text).await?;
    let content = content::insert_content(pool, student_id, &raw_text, layers).await?;

    tracing::info!(student_id, content_id = content.id, "Distillation complete");

    Ok(content)
}
