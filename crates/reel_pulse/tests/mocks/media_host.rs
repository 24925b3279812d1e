use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use reel_pulse::{
    media::{HostedMedia, MediaHost},
    Error,
};

#[derive(Clone, Default)]
pub struct MockMediaHost {
    pub uploads: Arc<Mutex<Vec<PathBuf>>>,
    pub deletes: Arc<Mutex<Vec<String>>>,
    pub fail_upload: Option<String>,
    pub fail_delete: bool,
}

impl MockMediaHost {
    pub const URL: &'static str = "https://res.example.com/video/upload/id123.mp4";
    pub const REMOTE_ID: &'static str = "id123";

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_upload: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Default::default()
        }
    }
}

impl MediaHost for MockMediaHost {
    async fn upload(&self, video: &Path) -> Result<HostedMedia, Error> {
        self.uploads.lock().unwrap().push(video.to_path_buf());
        if let Some(ref msg) = self.fail_upload {
            return Err(Error::UpstreamStatus {
                code: 500,
                body: msg.clone(),
            });
        }
        Ok(HostedMedia {
            url: Self::URL.to_string(),
            remote_id: Self::REMOTE_ID.to_string(),
        })
    }

    async fn delete(&self, remote_id: &str) -> Result<(), Error> {
        self.deletes.lock().unwrap().push(remote_id.to_string());
        if self.fail_delete {
            return Err(Error::UpstreamStatus {
                code: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(())
    }
}
