use std::fmt;

/// Failure of a single external or local operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    UpstreamTransport(#[from] reqwest::Error),
    #[error("API error: {code} - {body}")]
    UpstreamStatus { code: u16, body: String },
    #[error("Unexpected response format: {0}")]
    UpstreamFormat(String),
    #[error("API returned no output")]
    UpstreamEmpty,
    #[error("Timed out waiting for {what} after {attempts} attempts")]
    Timeout { what: &'static str, attempts: u32 },
    #[error("Failed to create media container: {status} - {body}")]
    PublishCreate { status: u16, body: String },
    #[error("Publish did not complete after {attempts} attempts: {last_status} - {last_body}")]
    PublishTimeout {
        attempts: u32,
        last_status: u16,
        last_body: String,
    },
    #[error("FFmpeg error: {0}")]
    Compose(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History error: {0:#}")]
    History(anyhow::Error),
}

impl Error {
    /// Stable name of the error kind, used in run diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UpstreamTransport(_) => "upstream_transport",
            Error::UpstreamStatus { .. } => "upstream_status",
            Error::UpstreamFormat(_) => "upstream_format",
            Error::UpstreamEmpty => "upstream_empty",
            Error::Timeout { .. } => "timeout",
            Error::PublishCreate { .. } => "publish_create",
            Error::PublishTimeout { .. } => "publish_timeout",
            Error::Compose(_) => "compose",
            Error::Io(_) => "io",
            Error::History(_) => "history",
        }
    }
}

/// Passes a successful response through; turns any other status into
/// [`Error::UpstreamStatus`] carrying the response body
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let code = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(Error::UpstreamStatus { code, body })
}

/// Forward states of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FetchVocab,
    BuildPrompt,
    GenerateImage,
    SynthAudio,
    ComposeVideo,
    Upload,
    Publish,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::FetchVocab,
        Stage::BuildPrompt,
        Stage::GenerateImage,
        Stage::SynthAudio,
        Stage::ComposeVideo,
        Stage::Upload,
        Stage::Publish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchVocab => "fetch_vocab",
            Stage::BuildPrompt => "build_prompt",
            Stage::GenerateImage => "generate_image",
            Stage::SynthAudio => "synth_audio",
            Stage::ComposeVideo => "compose_video",
            Stage::Upload => "upload",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed pipeline run: the stage that failed and why
#[derive(Debug, thiserror::Error)]
#[error("stage `{stage}` failed with {kind} error: {source}", kind = .source.kind())]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineError {
    pub fn new(stage: Stage, source: Error) -> Self {
        Self { stage, source }
    }
}
