//! MiniMax TTS service adapter.
//!
//! Wraps the MiniMax speech API behind the [`Service`] lifecycle contract and
//! exposes the domain operations the dispatch layer needs: synthesis from an
//! existing voice, voice cloning from an uploaded sample, and the combined
//! clone-then-synthesize workflow.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::{debug, info};

use super::config::MinimaxConfig;
use super::messages::{
    AudioSetting, CloneRequest, CloneResponse, FileUploadResponse, SpeechRequest, SpeechResponse,
    VoiceSetting,
};
use crate::core::service::{HealthStatus, Service, ServiceError, ServiceResult};
use crate::registry::ServiceConfig;

/// Registry name of the bundled MiniMax TTS service.
pub const SERVICE_NAME: &str = "minimax_tts";

/// Timeout for vendor calls; synthesis of long texts can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct MinimaxTts {
    name: String,
    config: MinimaxConfig,
    client: reqwest::Client,
    initialized: AtomicBool,
}

impl MinimaxTts {
    pub fn new(service_config: &ServiceConfig) -> ServiceResult<Self> {
        let config = MinimaxConfig::from_service_config(service_config);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            name: service_config.name.clone(),
            config,
            client,
            initialized: AtomicBool::new(false),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v1/{}?GroupId={}",
            self.config.base_url, path, self.config.group_id
        )
    }

    /// Synthesize `text` with an existing voice. Returns MP3 bytes.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> ServiceResult<Bytes> {
        let request = SpeechRequest {
            model: self.config.model.clone(),
            text: text.to_string(),
            stream: false,
            voice_setting: VoiceSetting::new(voice_id),
            audio_setting: AudioSetting::default(),
        };

        debug!(voice_id, chars = text.len(), "requesting speech synthesis");

        let response = self
            .client
            .post(self.endpoint("t2a_v2"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream(status, response.text().await.unwrap_or_default()));
        }

        let parsed: SpeechResponse = response.json().await?;
        if !parsed.base_resp.is_success() {
            return Err(vendor_error(status, &parsed.base_resp));
        }

        let audio_hex = parsed.data.map(|data| data.audio).unwrap_or_default();
        if audio_hex.is_empty() {
            return Err(upstream(status, "response contained no audio".to_string()));
        }

        let audio = hex::decode(&audio_hex)
            .map_err(|err| upstream(status, format!("invalid hex audio payload: {err}")))?;

        debug!(bytes = audio.len(), "synthesis complete");
        Ok(Bytes::from(audio))
    }

    /// Clone a new voice from an audio sample: upload the file, then create
    /// the clone under `voice_id`.
    pub async fn clone_voice(
        &self,
        voice_id: &str,
        file_name: &str,
        audio: Bytes,
    ) -> ServiceResult<()> {
        let file_id = self.upload_clone_sample(file_name, audio).await?;
        debug!(voice_id, file_id, "clone sample uploaded");

        let request = CloneRequest {
            file_id,
            voice_id: voice_id.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint("voice_clone"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream(status, response.text().await.unwrap_or_default()));
        }

        let parsed: CloneResponse = response.json().await?;
        if !parsed.base_resp.is_success() {
            return Err(vendor_error(status, &parsed.base_resp));
        }

        info!(voice_id, "voice clone created");
        Ok(())
    }

    /// Combined workflow: clone a voice from the sample, then synthesize
    /// `text` with it.
    pub async fn clone_and_synthesize(
        &self,
        text: &str,
        voice_id: &str,
        file_name: &str,
        audio: Bytes,
    ) -> ServiceResult<Bytes> {
        self.clone_voice(voice_id, file_name, audio).await?;
        self.synthesize(text, voice_id).await
    }

    async fn upload_clone_sample(&self, file_name: &str, audio: Bytes) -> ServiceResult<i64> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "voice_clone")
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("files/upload"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream(status, response.text().await.unwrap_or_default()));
        }

        let parsed: FileUploadResponse = response.json().await?;
        if !parsed.base_resp.is_success() {
            return Err(vendor_error(status, &parsed.base_resp));
        }

        parsed
            .file
            .map(|file| file.file_id)
            .ok_or_else(|| upstream(status, "upload response contained no file id".to_string()))
    }
}

fn upstream(status: reqwest::StatusCode, message: String) -> ServiceError {
    ServiceError::Upstream {
        status: status.as_u16(),
        message,
    }
}

fn vendor_error(status: reqwest::StatusCode, base_resp: &super::messages::BaseResp) -> ServiceError {
    ServiceError::Upstream {
        status: status.as_u16(),
        message: format!(
            "minimax status {}: {}",
            base_resp.status_code, base_resp.status_msg
        ),
    }
}

#[async_trait]
impl Service for MinimaxTts {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> ServiceResult<()> {
        self.config.validate()?;
        self.initialized.store(true, Ordering::SeqCst);
        info!(
            service = %self.name,
            model = %self.config.model,
            base_url = %self.config.base_url,
            "minimax tts service initialized"
        );
        Ok(())
    }

    async fn shutdown(&self) -> ServiceResult<()> {
        self.initialized.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        let detail = json!({
            "provider": "minimax",
            "model": self.config.model,
            "base_url": self.config.base_url,
            "initialized": self.initialized.load(Ordering::SeqCst),
        });
        if self.initialized.load(Ordering::SeqCst) {
            HealthStatus::healthy(detail)
        } else {
            HealthStatus::unhealthy(detail)
        }
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
