pub mod instagram;

use std::future::Future;

use serde::Deserialize;

use crate::{poll::PollPolicy, Error};

/// Marker the platform returns while it is still ingesting the video
pub const MEDIA_NOT_READY_MARKER: &str = "Media ID is not available";

/// Two-step publishing: stage a container, then publish from it
pub trait Publisher {
    /// Creates a media container for the hosted video and returns its id
    fn create_container(
        &self,
        video_url: &str,
        caption: &str,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    /// Makes a single publish-from-container call
    fn attempt_publish(
        &self,
        container_id: &str,
    ) -> impl Future<Output = Result<PublishAttempt, Error>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Pending,
    Published,
    Failed,
}

/// Raw outcome of one publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAttempt {
    pub status: u16,
    pub body: String,
}

impl PublishAttempt {
    pub fn is_success(&self) -> bool {
        is_success_status(self.status) && !is_transient_publish_error(&self.body)
    }
}

/// Status check shared by container creation and publishing
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// A staged post and where it stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishContainer {
    pub container_id: String,
    pub status: PublishStatus,
}

impl PublishContainer {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            status: PublishStatus::Pending,
        }
    }
}

/// Whether a publish response says the media is not ingested yet
pub fn is_transient_publish_error(body: &str) -> bool {
    body.contains(MEDIA_NOT_READY_MARKER)
}

#[derive(Debug, Deserialize)]
struct PublishedMedia {
    id: String,
}

/// Publishes `container`, retrying while the platform is not ready, and
/// returns the published media id.
///
/// An attempt succeeds only with a 2xx status and no not-ready marker in
/// the body; anything else is retried until the budget runs out, and the
/// last status and body are reported in [`Error::PublishTimeout`].
/// Transport failures abort immediately and leave the container pending.
/// `container.status` ends as `Published` or `Failed` otherwise.
#[tracing::instrument(skip(publisher))]
pub async fn publish<P: Publisher>(
    publisher: &P,
    container: &mut PublishContainer,
    policy: PollPolicy,
) -> Result<String, Error> {
    let mut last = None;

    for attempt in 1..=policy.max_attempts {
        let outcome = publisher.attempt_publish(&container.container_id).await?;

        if outcome.is_success() {
            container.status = PublishStatus::Published;
            let published = serde_json::from_str::<PublishedMedia>(&outcome.body)
                .map_err(|e| Error::UpstreamFormat(format!("publish response: {e}")))?;
            tracing::info!(attempt, container_id = %container.container_id, media_id = %published.id, "Reel published");
            return Ok(published.id);
        }

        tracing::info!(
            attempt,
            status = outcome.status,
            body = %outcome.body,
            "Publish not accepted yet"
        );
        last = Some(outcome);
        policy.pause_after(attempt).await;
    }

    container.status = PublishStatus::Failed;
    tracing::error!(container_id = %container.container_id, "Publish retries exhausted");

    let last = last.unwrap_or(PublishAttempt {
        status: 0,
        body: String::new(),
    });
    Err(Error::PublishTimeout {
        attempts: policy.max_attempts,
        last_status: last.status,
        last_body: last.body,
    })
}
