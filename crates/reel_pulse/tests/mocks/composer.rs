use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use reel_pulse::{media::VideoComposer, Error};

#[derive(Clone, Default)]
pub struct MockComposer {
    pub calls: Arc<Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>>,
    pub fail_with: Option<String>,
}

impl MockComposer {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl VideoComposer for MockComposer {
    async fn compose(&self, image: &Path, audio: &Path, out: &Path) -> Result<(), Error> {
        self.calls
            .lock()
            .unwrap()
            .push((image.to_path_buf(), audio.to_path_buf(), out.to_path_buf()));

        assert!(image.exists(), "image must exist before composing");
        assert!(audio.exists(), "audio must exist before composing");

        tokio::fs::write(out, b"mp4").await?;
        if let Some(ref msg) = self.fail_with {
            // leaves a partial file behind, like a crashed encoder
            return Err(Error::Compose(msg.clone()));
        }
        Ok(())
    }
}
