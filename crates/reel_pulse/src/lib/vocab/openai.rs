use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    vocab::{VocabularyItem, VocabularySource},
    Error,
};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// User message asking for a fresh word while steering clear of `exclusions`
    pub fn vocabulary_request(exclusions: &[String]) -> String {
        let mut content = String::from("Give me a new German vocabulary word.");
        if !exclusions.is_empty() {
            content.push_str(&format!(
                " Do not use the following words: {}.",
                exclusions.iter().join(", ")
            ));
        }
        content
    }

    pub async fn send_completion_request(
        &self,
        model_name: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, Error> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "temperature": 0.7,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { code, body });
        }

        resp.json::<CompletionResponse>()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("completion response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl VocabularySource for OpenAIClient {
    const VOCABULARY_MODEL: &'static str = "gpt-4o-mini";

    #[tracing::instrument(skip_all, fields(excluded = exclusions.len()))]
    async fn fetch(&self, exclusions: &[String]) -> Result<VocabularyItem, Error> {
        let response = self
            .send_completion_request(Self::VOCABULARY_MODEL, Self::vocabulary_request(exclusions))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch vocabulary"))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(Error::UpstreamEmpty)?;

        VocabularyItem::from_reply(&content)
    }
}
