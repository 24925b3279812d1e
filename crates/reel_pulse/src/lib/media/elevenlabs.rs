use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::{
    error::ensure_success,
    media::{write_body_to_file, AudioProvider},
    Error,
};

/// ElevenLabs text-to-speech client
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    voice_id: String,
    base_url: String,
}

impl ElevenLabsClient {
    const MODEL_ID: &str = "eleven_multilingual_v2";

    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            base_url: "https://api.elevenlabs.io/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Wraps `text` for repeat-after-me listening: once slowly, then twice
/// more extra slowly, with a two second pause before each repetition.
pub fn paced_speech_markup(text: &str) -> String {
    let text = text.trim();
    format!(
        "<speak>\
         <prosody rate=\"slow\">{text}</prosody>\
         <break time=\"2s\"/>\
         <prosody rate=\"x-slow\">{text}</prosody>\
         <break time=\"2s\"/>\
         <prosody rate=\"x-slow\">{text}</prosody>\
         </speak>"
    )
}

impl AudioProvider for ElevenLabsClient {
    #[tracing::instrument(skip(self))]
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<PathBuf, Error> {
        let body = serde_json::json!({
            "text": paced_speech_markup(text),
            "model_id": Self::MODEL_ID,
        });

        let resp = self
            .client
            .post(format!("{}/text-to-speech/{}", self.base_url, self.voice_id))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let resp = ensure_success(resp)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Speech synthesis rejected"))?;

        write_body_to_file(resp, dest).await?;
        Ok(dest.to_path_buf())
    }
}
