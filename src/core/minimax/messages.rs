//! Wire types for the MiniMax TTS API.
//!
//! Covers the three endpoints the adapter uses:
//! - `POST /v1/t2a_v2`: speech synthesis, audio returned hex-encoded
//! - `POST /v1/files/upload`: clone sample upload (multipart)
//! - `POST /v1/voice_clone`: voice clone creation
//!
//! Every response carries a `base_resp` envelope; `status_code` zero means
//! success, anything else is a vendor-side failure.

use serde::{Deserialize, Serialize};

/// Voice parameters for synthesis.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSetting {
    pub voice_id: String,
    pub speed: f32,
    pub vol: f32,
    pub pitch: i32,
}

impl VoiceSetting {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            speed: 1.0,
            vol: 1.0,
            pitch: 0,
        }
    }
}

/// Output encoding parameters. MP3 matches what the gateway streams back.
#[derive(Debug, Clone, Serialize)]
pub struct AudioSetting {
    pub sample_rate: u32,
    pub bitrate: u32,
    pub format: String,
    pub channel: u32,
}

impl Default for AudioSetting {
    fn default() -> Self {
        Self {
            sample_rate: 32_000,
            bitrate: 128_000,
            format: "mp3".to_string(),
            channel: 1,
        }
    }
}

/// Body for `POST /v1/t2a_v2`.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    pub model: String,
    pub text: String,
    pub stream: bool,
    pub voice_setting: VoiceSetting,
    pub audio_setting: AudioSetting,
}

/// Status envelope present in every MiniMax response.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseResp {
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: String,
}

impl BaseResp {
    pub fn is_success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeechData {
    /// Hex-encoded audio payload.
    #[serde(default)]
    pub audio: String,
}

/// Response for `POST /v1/t2a_v2`.
#[derive(Debug, Deserialize)]
pub struct SpeechResponse {
    #[serde(default)]
    pub data: Option<SpeechData>,
    pub base_resp: BaseResp,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub file_id: i64,
}

/// Response for `POST /v1/files/upload`.
#[derive(Debug, Deserialize)]
pub struct FileUploadResponse {
    #[serde(default)]
    pub file: Option<UploadedFile>,
    pub base_resp: BaseResp,
}

/// Body for `POST /v1/voice_clone`.
#[derive(Debug, Clone, Serialize)]
pub struct CloneRequest {
    pub file_id: i64,
    pub voice_id: String,
}

/// Response for `POST /v1/voice_clone`.
#[derive(Debug, Deserialize)]
pub struct CloneResponse {
    pub base_resp: BaseResp,
}
