use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::labeling::{group_pairs, save_upload, LabelResponse};
use crate::state::AppState;
use crate::translate::{is_same_language, TranslateRequest, TranslateResponse};
use crate::vision::VisionCredentials;

pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    if request.text.is_empty() {
        return Ok((StatusCode::OK, Json(json!({ "translatedText": "" }))));
    }

    if is_same_language(&request.source_lang, &request.target_lang) {
        return Err(ApiError::validation("source and target language must differ"));
    }

    let translated_text = state
        .gateway
        .translate(
            &request.text,
            &request.service,
            &request.source_lang,
            &request.target_lang,
        )
        .await?;

    let body = TranslateResponse {
        success: true,
        translated_text,
    };
    Ok((StatusCode::OK, Json(json!(body))))
}

/// Form fields of a labeling request, with defaults applied
#[derive(Debug, Default)]
struct LabelForm {
    api_key: Option<String>,
    base_url: Option<String>,
    system_prompt: Option<String>,
    model: Option<String>,
    include_archive: bool,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Label reference/target image pairs.
///
/// # Request Format:
/// - multipart/form-data
/// - `api_key` (required), `base_url`, `system_prompt`, `model`, `include_archive`
/// - `images`: files named `{base}_R.{ext}` / `{base}_T.{ext}`
///
/// Uploads are written to a per-request session directory that is removed
/// when this handler returns, on every path.
pub async fn label_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LabelResponse>, ApiError> {
    let start_time = std::time::Instant::now();
    let session = state.sessions.create_session()?;

    let mut form = LabelForm::default();
    let mut saved = Vec::new();
    let mut uploaded = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "images" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Read error: {}", e)))?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                uploaded += 1;
                if let Some(path) = save_upload(&session, &file_name, &data).await? {
                    saved.push(path);
                }
            }
            "api_key" | "base_url" | "system_prompt" | "model" | "include_archive" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Read error: {}", e)))?;
                match name.as_str() {
                    "api_key" => form.api_key = non_blank(value),
                    "base_url" => form.base_url = non_blank(value),
                    "system_prompt" => form.system_prompt = non_blank(value),
                    "model" => form.model = non_blank(value),
                    _ => form.include_archive = matches!(value.trim(), "true" | "1"),
                }
            }
            other => warn!("Ignoring unexpected form field: {}", other),
        }
    }

    let api_key = form
        .api_key
        .ok_or_else(|| ApiError::validation("API key is required"))?;

    if uploaded == 0 {
        return Err(ApiError::validation("no files uploaded"));
    }

    let grouping = group_pairs(&saved);
    if grouping.pairs.is_empty() {
        return Err(ApiError::validation("no valid pairs found"));
    }

    let vision = &state.config.vision;
    let credentials = VisionCredentials {
        api_key,
        base_url: form.base_url.unwrap_or_else(|| vision.default_base_url.clone()),
        model: form.model.unwrap_or_else(|| vision.default_model.clone()),
    };
    let system_prompt = form
        .system_prompt
        .unwrap_or_else(|| vision.default_system_prompt.clone());

    let outcome = state
        .orchestrator
        .label_pairs(&session, &grouping.pairs, &credentials, &system_prompt)
        .await;

    let succeeded = outcome.results.iter().filter(|r| r.is_success()).count();
    info!(
        "Label request completed in {:.2}s: {} successful, {} failed, {} incomplete",
        start_time.elapsed().as_secs_f64(),
        succeeded,
        outcome.results.len() - succeeded,
        grouping.incomplete.len()
    );

    let archive = if form.include_archive {
        outcome.archive.as_ref().map(|bytes| STANDARD.encode(bytes))
    } else {
        None
    };

    session.destroy();

    Ok(Json(LabelResponse {
        success: true,
        results: outcome.results,
        incomplete: grouping.incomplete,
        archive,
    }))
}
