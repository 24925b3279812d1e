use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use reel_pulse::{media::AudioProvider, Error};

#[derive(Clone, Default)]
pub struct MockAudioProvider {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockAudioProvider {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl AudioProvider for MockAudioProvider {
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<PathBuf, Error> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::UpstreamStatus {
                code: 401,
                body: msg.clone(),
            });
        }
        tokio::fs::write(dest, b"mp3").await?;
        Ok(dest.to_path_buf())
    }
}
