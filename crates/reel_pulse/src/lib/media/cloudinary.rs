use std::path::Path;

use anyhow::Context;
use itertools::Itertools;
use reqwest::{
    multipart::{Form, Part},
    Body, Client, Url,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio_util::io::ReaderStream;

use crate::{
    error::ensure_success,
    media::{HostedMedia, MediaHost},
    Error,
};

/// Credentials parsed from a `cloudinary://<api_key>:<api_secret>@<cloud_name>` URL
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl CloudinaryCredentials {
    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(url).context("Invalid media host URL")?;
        anyhow::ensure!(
            parsed.scheme() == "cloudinary",
            "Media host URL must use the cloudinary:// scheme"
        );

        let api_key = parsed.username();
        let api_secret = parsed
            .password()
            .context("Media host URL is missing the API secret")?;
        let cloud_name = parsed
            .host_str()
            .context("Media host URL is missing the cloud name")?;
        anyhow::ensure!(!api_key.is_empty(), "Media host URL is missing the API key");

        Ok(Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }

    /// Parameters that travel with a request but are never part of the
    /// signed string
    const UNSIGNED_PARAMS: [&str; 5] = [
        "api_key",
        "cloud_name",
        "file",
        "resource_type",
        "signature_algorithm",
    ];

    /// Signs request parameters: sorted `key=value` pairs joined by `&`,
    /// followed by the API secret, SHA-256 hex encoded.
    /// Unsigned parameters are skipped even when passed in.
    pub fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign = params
            .iter()
            .filter(|(k, _)| !Self::UNSIGNED_PARAMS.iter().any(|p| p == k))
            .sorted_by_key(|(k, _)| *k)
            .map(|(k, v)| format!("{k}={v}"))
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Completes `params` with the key, signature and digest name. The
    /// account default digest is SHA-1, so `signature_algorithm` has to be
    /// sent alongside a SHA-256 signature.
    pub fn signed_params(
        &self,
        mut params: Vec<(&'static str, String)>,
    ) -> Vec<(&'static str, String)> {
        let signature = {
            let borrowed = params
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect::<Vec<_>>();
            self.sign(&borrowed)
        };

        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params
    }
}

/// Cloudinary video storage via the signed upload API
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    client: Client,
    credentials: CloudinaryCredentials,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryClient {
    const RESOURCE_TYPE: &str = "video";

    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            base_url: "https://api.cloudinary.com/v1_1".into(),
        }
    }

    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        CloudinaryCredentials::from_url(url).map(Self::new)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/{}/{action}",
            self.base_url,
            self.credentials.cloud_name,
            Self::RESOURCE_TYPE
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }
}

impl MediaHost for CloudinaryClient {
    #[tracing::instrument(skip(self))]
    async fn upload(&self, video: &Path) -> Result<HostedMedia, Error> {
        let file = tokio::fs::File::open(video).await?;
        let len = file.metadata().await?.len();
        let file_name = video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reel.mp4".into());

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
            .file_name(file_name)
            .mime_str("video/mp4")?;

        let form = self
            .credentials
            .signed_params(vec![("timestamp", Self::timestamp())])
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .part("file", part);

        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to upload video"))?;

        let uploaded = ensure_success(resp)
            .await?
            .json::<UploadResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("upload response: {e}")))?;

        tracing::info!(public_id = %uploaded.public_id, url = %uploaded.secure_url, "Video uploaded");
        Ok(HostedMedia {
            url: uploaded.secure_url,
            remote_id: uploaded.public_id,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, remote_id: &str) -> Result<(), Error> {
        let params = self.credentials.signed_params(vec![
            ("public_id", remote_id.to_string()),
            ("timestamp", Self::timestamp()),
        ]);

        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await?;

        let destroyed = ensure_success(resp)
            .await?
            .json::<DestroyResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("destroy response: {e}")))?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                tracing::warn!("Remote video was already gone");
                Ok(())
            }
            other => Err(Error::UpstreamFormat(format!(
                "unexpected destroy result `{other}`"
            ))),
        }
    }
}
