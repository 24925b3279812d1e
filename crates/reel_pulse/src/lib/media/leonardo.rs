use std::path::Path;

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ensure_success,
    media::{write_body_to_file, GenerationJob, ImageProvider, JobStatus},
    Error,
};

/// Leonardo.ai generation client
#[derive(Debug, Clone)]
pub struct LeonardoClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LeonardoClient {
    const MODEL_ID: &str = "6b645e3a-d64f-4341-a6d8-7a3690fbf042";
    const STYLE_UUID: &str = "111dc692-d470-4eec-b791-3475abac4c46";
    // fixed so every reel shares the same look
    const SEED: &str = "8933646694";
    const WIDTH: u32 = 1080;
    const HEIGHT: u32 = 1920;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://cloud.leonardo.ai/api/rest/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn generation_payload(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "modelId": Self::MODEL_ID,
            "styleUUID": Self::STYLE_UUID,
            "prompt": prompt,
            "num_images": 1,
            "width": Self::WIDTH,
            "height": Self::HEIGHT,
            "contrast": 3.5,
            "alchemy": true,
            "enhancePrompt": false,
            "seed": Self::SEED,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreateGenerationResponse {
    #[serde(rename = "sdGenerationJob")]
    sd_generation_job: SdGenerationJob,
}

#[derive(Debug, Deserialize)]
struct SdGenerationJob {
    #[serde(rename = "generationId")]
    generation_id: String,
}

#[derive(Debug, Deserialize)]
struct GenerationStatusResponse {
    generations_by_pk: GenerationByPk,
}

#[derive(Debug, Deserialize)]
struct GenerationByPk {
    status: JobStatus,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

impl ImageProvider for LeonardoClient {
    #[tracing::instrument(skip_all)]
    async fn submit(&self, prompt: &str) -> Result<String, Error> {
        let resp = self
            .client
            .post(format!("{}/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .json(&Self::generation_payload(prompt))
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to submit generation"))?;

        let created = ensure_success(resp)
            .await?
            .json::<CreateGenerationResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("generation response: {e}")))?;

        let job_id = created.sd_generation_job.generation_id;
        tracing::info!(%job_id, "Submitted image generation");
        Ok(job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, Error> {
        let resp = self
            .client
            .get(format!("{}/generations/{job_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = ensure_success(resp)
            .await?
            .json::<GenerationStatusResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("generation status: {e}")))?
            .generations_by_pk;

        Ok(GenerationJob {
            job_id: job_id.to_string(),
            status: status.status,
            result_urls: status.generated_images.into_iter().map(|i| i.url).collect(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn download(&self, image_url: &str, dest: &Path) -> Result<(), Error> {
        let resp = self
            .client
            .get(image_url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to download image"))?;

        write_body_to_file(ensure_success(resp).await?, dest).await
    }
}
