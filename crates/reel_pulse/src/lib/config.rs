//! Runtime settings: credentials for the five external services.
//!
//! Settings come either from a JSON file or from environment variables.
//! The JSON file also accepts the key names of the legacy
//! `config/config.json` layout (`chatgpt_api_key`, `leonardo_api_key`, ...).

use std::{fmt, path::Path};

use anyhow::Context;
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(alias = "chatgpt_api_key")]
    pub vocabulary_api_key: String,
    #[serde(alias = "leonardo_api_key")]
    pub image_api_key: String,
    #[serde(alias = "elevenlabs_api_key")]
    pub speech_api_key: String,
    #[serde(alias = "elevenlabs_voice_id")]
    pub speech_voice_id: String,
    #[serde(alias = "instagram_user_id")]
    pub publish_user_id: String,
    #[serde(alias = "instagram_access_token")]
    pub publish_access_token: String,
    /// `cloudinary://<api_key>:<api_secret>@<cloud_name>`
    #[serde(alias = "cloudinary_url")]
    pub media_host_url: String,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        fn var(name: &str) -> anyhow::Result<String> {
            std::env::var(name).with_context(|| format!("{name} not set"))
        }

        Ok(Self {
            vocabulary_api_key: var("VOCABULARY_API_KEY")?,
            image_api_key: var("IMAGE_API_KEY")?,
            speech_api_key: var("SPEECH_API_KEY")?,
            speech_voice_id: var("SPEECH_VOICE_ID")?,
            publish_user_id: var("PUBLISH_USER_ID")?,
            publish_access_token: var("PUBLISH_ACCESS_TOKEN")?,
            media_host_url: var("MEDIA_HOST_URL")?,
        })
    }
}

// Keeps secrets out of logs
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("speech_voice_id", &self.speech_voice_id)
            .field("publish_user_id", &self.publish_user_id)
            .finish_non_exhaustive()
    }
}
