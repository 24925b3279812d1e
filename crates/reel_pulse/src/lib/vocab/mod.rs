pub mod openai;

use std::{future::Future, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("valid code fence regex")
});

/// Produces a new vocabulary item, avoiding the given words
pub trait VocabularySource {
    const VOCABULARY_MODEL: &'static str;

    fn fetch(
        &self,
        exclusions: &[String],
    ) -> impl Future<Output = Result<VocabularyItem, Error>> + Send;
}

/// One word to teach: the known-language word, its translation and the
/// texts that go with the post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    #[serde(rename = "english")]
    pub source_word: String,
    #[serde(rename = "german")]
    pub target_word: String,
    pub caption: String,
    #[serde(rename = "sentence")]
    pub example_sentence: String,
}

impl VocabularyItem {
    /// Parses a model reply into a vocabulary item.
    ///
    /// Accepts a bare JSON object or one wrapped in a Markdown code fence.
    /// All four fields must be present and non-blank.
    pub fn from_reply(content: &str) -> Result<Self, Error> {
        let json = CODE_FENCE_RE
            .captures(content)
            .and_then(|c| c.get(1))
            .map_or(content.trim(), |m| m.as_str());

        let item = serde_json::from_str::<VocabularyItem>(json)
            .map_err(|e| Error::UpstreamFormat(format!("vocabulary reply: {e}")))?;

        let blank = [
            ("english", &item.source_word),
            ("german", &item.target_word),
            ("caption", &item.caption),
            ("sentence", &item.example_sentence),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty());

        if let Some((field, _)) = blank {
            return Err(Error::UpstreamFormat(format!(
                "vocabulary reply has empty `{field}`"
            )));
        }

        Ok(item)
    }
}
