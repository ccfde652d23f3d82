//! Speech synthesis endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;

use crate::core::minimax::{self, MinimaxTts};
use crate::errors::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateSpeechRequest {
    pub text: String,
    pub voice_id: String,
}

/// `POST /api/v1/tts/generate`: synthesize audio from text using an
/// existing voice. Responds with MP3 bytes.
pub async fn generate_speech(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateSpeechRequest>,
) -> ApiResult<Response> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    if request.voice_id.trim().is_empty() {
        return Err(ApiError::BadRequest("voice_id must not be empty".to_string()));
    }

    let tts = state.registry.get_as::<MinimaxTts>(minimax::SERVICE_NAME)?;
    let audio = tts.synthesize(&request.text, &request.voice_id).await?;

    Ok(mpeg_response(audio))
}

/// Build an `audio/mpeg` response from synthesized bytes.
pub fn mpeg_response(audio: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response()
}
