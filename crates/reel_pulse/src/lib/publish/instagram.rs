use reqwest::Client;
use serde::Deserialize;

use crate::{
    publish::{is_success_status, PublishAttempt, Publisher},
    Error,
};

/// Instagram Graph API reels publisher
#[derive(Debug, Clone)]
pub struct InstagramClient {
    client: Client,
    user_id: String,
    access_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ContainerResponse {
    id: String,
}

impl InstagramClient {
    const MEDIA_TYPE: &str = "REELS";

    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_id: user_id.into(),
            access_token: access_token.into(),
            base_url: "https://graph.instagram.com/v22.0".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Publisher for InstagramClient {
    #[tracing::instrument(skip(self, caption))]
    async fn create_container(&self, video_url: &str, caption: &str) -> Result<String, Error> {
        let body = serde_json::json!({
            "media_type": Self::MEDIA_TYPE,
            "video_url": video_url,
            "caption": caption,
        });

        let resp = self
            .client
            .post(format!("{}/{}/media", self.base_url, self.user_id))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to create media container"))?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        tracing::debug!(status, %body, "Container creation response");

        if !is_success_status(status) {
            return Err(Error::PublishCreate { status, body });
        }

        match serde_json::from_str::<ContainerResponse>(&body) {
            Ok(container) if !container.id.is_empty() => Ok(container.id),
            _ => Err(Error::PublishCreate { status, body }),
        }
    }

    async fn attempt_publish(&self, container_id: &str) -> Result<PublishAttempt, Error> {
        let resp = self
            .client
            .post(format!("{}/{}/media_publish", self.base_url, self.user_id))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "creation_id": container_id }))
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to publish media container"))?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(PublishAttempt { status, body })
    }
}
