//! Voice cloning endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use super::speech::mpeg_response;
use crate::core::minimax::{self, MinimaxTts};
use crate::errors::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VoiceCloneResponse {
    pub success: bool,
    pub message: String,
    pub voice_id: Option<String>,
}

/// Multipart fields accepted by the clone endpoints.
struct CloneForm {
    text: Option<String>,
    voice_id: Option<String>,
    file_name: String,
    audio: Option<Bytes>,
}

/// `POST /api/v1/voice/clone`: upload an audio sample and create a voice
/// clone under `new_voice_id`.
pub async fn clone_voice(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<VoiceCloneResponse>> {
    let form = read_clone_form(multipart).await?;
    let voice_id = require_voice_id(&form)?;
    let audio = require_audio(&form)?;

    let tts = state.registry.get_as::<MinimaxTts>(minimax::SERVICE_NAME)?;
    tts.clone_voice(&voice_id, &form.file_name, audio).await?;

    info!(voice_id = %voice_id, "voice cloned");
    Ok(Json(VoiceCloneResponse {
        success: true,
        message: format!("Voice '{voice_id}' cloned successfully."),
        voice_id: Some(voice_id),
    }))
}

/// `POST /api/v1/voice/clone-and-generate`: clone a voice from the uploaded
/// sample, then immediately synthesize `text` with it. Responds with MP3
/// bytes.
pub async fn clone_and_generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = read_clone_form(multipart).await?;
    let voice_id = require_voice_id(&form)?;
    let audio = require_audio(&form)?;
    let text = form
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::BadRequest("text must not be empty".to_string()))?
        .to_string();

    let tts = state.registry.get_as::<MinimaxTts>(minimax::SERVICE_NAME)?;
    let audio = tts
        .clone_and_synthesize(&text, &voice_id, &form.file_name, audio)
        .await?;

    Ok(mpeg_response(audio))
}

async fn read_clone_form(mut multipart: Multipart) -> ApiResult<CloneForm> {
    let mut form = CloneForm {
        text: None,
        voice_id: None,
        file_name: "sample.mp3".to_string(),
        audio: None,
    };

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("text") => form.text = Some(field.text().await?),
            Some("new_voice_id") => form.voice_id = Some(field.text().await?),
            Some("audio_file") => {
                if let Some(file_name) = field.file_name() {
                    form.file_name = file_name.to_string();
                }
                form.audio = Some(field.bytes().await?);
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    Ok(form)
}

fn require_voice_id(form: &CloneForm) -> ApiResult<String> {
    let voice_id = form
        .voice_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("new_voice_id form field is required".to_string()))?;
    validate_voice_id(voice_id)?;
    Ok(voice_id.to_string())
}

fn require_audio(form: &CloneForm) -> ApiResult<Bytes> {
    form.audio
        .clone()
        .filter(|audio| !audio.is_empty())
        .ok_or_else(|| ApiError::BadRequest("audio_file form field is required".to_string()))
}

/// Voice IDs must be at least 8 characters, start with a letter, and contain
/// ASCII alphanumerics only.
fn validate_voice_id(voice_id: &str) -> ApiResult<()> {
    let valid = voice_id.len() >= 8
        && voice_id
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
        && voice_id.chars().all(|ch| ch.is_ascii_alphanumeric());

    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "new_voice_id must be at least 8 characters, start with a letter, \
             and contain only letters and digits"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_voice_ids_accepted() {
        for id in ["MyCustomVoice01", "abcdefgh", "A1234567"] {
            assert!(validate_voice_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn invalid_voice_ids_rejected() {
        for id in ["short", "1StartsWithDigit", "has spaces!", "with-dash", ""] {
            assert!(validate_voice_id(id).is_err(), "{id} should be invalid");
        }
    }
}
