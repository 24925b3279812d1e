pub mod cloudinary;
pub mod elevenlabs;
pub mod ffmpeg;
pub mod leonardo;

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use futures::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

use crate::{poll::PollPolicy, Error};

/// Asynchronous image generation: submit a job, poll it, fetch the result
pub trait ImageProvider {
    /// Submits a generation job and returns its id
    fn submit(&self, prompt: &str) -> impl Future<Output = Result<String, Error>> + Send;

    /// Reads the current state of a job
    fn job_status(&self, job_id: &str)
        -> impl Future<Output = Result<GenerationJob, Error>> + Send;

    /// Streams the image at `image_url` into `dest`
    fn download(&self, image_url: &str, dest: &Path)
        -> impl Future<Output = Result<(), Error>> + Send;
}

/// Speech synthesis into a local audio file
pub trait AudioProvider {
    fn synthesize(&self, text: &str, dest: &Path)
        -> impl Future<Output = Result<PathBuf, Error>> + Send;
}

/// Merges a still image and an audio track into a video file
pub trait VideoComposer {
    fn compose(
        &self,
        image: &Path,
        audio: &Path,
        out: &Path,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Public hosting for the composed video
pub trait MediaHost {
    fn upload(&self, video: &Path) -> impl Future<Output = Result<HostedMedia, Error>> + Send;

    fn delete(&self, remote_id: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Complete,
    Failed,
}

/// Snapshot of a remote generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub job_id: String,
    pub status: JobStatus,
    pub result_urls: Vec<String>,
}

impl GenerationJob {
    /// The first result URL, once the job is complete and has one
    pub fn ready_url(&self) -> Option<&str> {
        if self.status != JobStatus::Complete {
            return None;
        }
        self.result_urls
            .iter()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

/// A video as stored on the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedMedia {
    pub url: String,
    pub remote_id: String,
}

/// A pipeline artifact: its local file and, once uploaded, its hosted copy
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub local_path: PathBuf,
    pub remote: Option<HostedMedia>,
}

impl MediaAsset {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: path.into(),
            remote: None,
        }
    }
}

/// Polls `job_id` until it completes with a result URL.
///
/// A poll that fails is treated like one that is not complete yet. Makes at
/// most `policy.max_attempts` polls, then gives up with [`Error::Timeout`].
#[tracing::instrument(skip(provider))]
pub async fn await_result<I: ImageProvider>(
    provider: &I,
    job_id: &str,
    policy: PollPolicy,
) -> Result<String, Error> {
    for attempt in 1..=policy.max_attempts {
        match provider.job_status(job_id).await {
            Ok(job) => {
                if let Some(url) = job.ready_url() {
                    tracing::info!(attempt, "Image generation complete");
                    return Ok(url.to_string());
                }
                if job.status == JobStatus::Failed {
                    tracing::warn!(attempt, "Generation job reported FAILED");
                } else {
                    tracing::debug!(attempt, status = ?job.status, "Image not ready yet");
                }
            }
            Err(e) => tracing::warn!(attempt, error = %e, "Failed to poll generation job"),
        }

        policy.pause_after(attempt).await;
    }

    Err(Error::Timeout {
        what: "image generation",
        attempts: policy.max_attempts,
    })
}

/// Streams a successful response body into `dest`
pub(crate) async fn write_body_to_file(resp: reqwest::Response, dest: &Path) -> Result<(), Error> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = resp.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(())
}
