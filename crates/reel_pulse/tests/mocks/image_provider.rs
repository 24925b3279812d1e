use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use reel_pulse::{
    media::{GenerationJob, ImageProvider, JobStatus},
    Error,
};

/// Reports PENDING for `pending_polls` polls, then COMPLETE with `url`
#[derive(Clone)]
pub struct MockImageProvider {
    pub pending_polls: usize,
    pub url: String,
    pub polls: Arc<Mutex<usize>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub downloads: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub poll_error_on: Vec<usize>,
}

impl MockImageProvider {
    pub fn completing_after(pending_polls: usize) -> Self {
        Self {
            pending_polls,
            url: "https://cdn.example.com/generated/apfel.jpg".to_string(),
            polls: Arc::new(Mutex::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            downloads: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            poll_error_on: Vec::new(),
        }
    }

    pub fn never_completing() -> Self {
        Self::completing_after(usize::MAX)
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::completing_after(0)
        }
    }

    /// Makes the given (1-based) polls fail at the transport level
    pub fn with_poll_errors(mut self, polls: &[usize]) -> Self {
        self.poll_error_on = polls.to_vec();
        self
    }

    pub fn poll_count(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

impl ImageProvider for MockImageProvider {
    async fn submit(&self, prompt: &str) -> Result<String, Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::UpstreamStatus {
                code: 402,
                body: msg.clone(),
            });
        }
        Ok("gen-42".to_string())
    }

    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, Error> {
        let poll = {
            let mut polls = self.polls.lock().unwrap();
            *polls += 1;
            *polls
        };

        if self.poll_error_on.contains(&poll) {
            return Err(Error::UpstreamFormat("truncated body".into()));
        }

        if poll > self.pending_polls {
            Ok(GenerationJob {
                job_id: job_id.to_string(),
                status: JobStatus::Complete,
                result_urls: vec![self.url.clone()],
            })
        } else {
            Ok(GenerationJob {
                job_id: job_id.to_string(),
                status: JobStatus::Pending,
                result_urls: Vec::new(),
            })
        }
    }

    async fn download(&self, image_url: &str, dest: &Path) -> Result<(), Error> {
        self.downloads.lock().unwrap().push(image_url.to_string());
        tokio::fs::write(dest, b"jpeg").await?;
        Ok(())
    }
}
