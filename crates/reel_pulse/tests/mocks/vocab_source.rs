use std::sync::{Arc, Mutex};

use reel_pulse::{Error, VocabularyItem, VocabularySource};

#[derive(Clone)]
pub struct MockVocabSource {
    pub item: VocabularyItem,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
}

impl MockVocabSource {
    pub fn new(source_word: &str, target_word: &str) -> Self {
        Self {
            item: VocabularyItem {
                source_word: source_word.to_string(),
                target_word: target_word.to_string(),
                caption: format!("{target_word} = {source_word}"),
                example_sentence: format!("Das ist {target_word}."),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("apple", "der Apfel")
        }
    }
}

impl VocabularySource for MockVocabSource {
    const VOCABULARY_MODEL: &'static str = "mock-gpt";

    async fn fetch(&self, exclusions: &[String]) -> Result<VocabularyItem, Error> {
        self.calls.lock().unwrap().push(exclusions.to_vec());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::UpstreamStatus {
                code: 500,
                body: msg.clone(),
            });
        }
        Ok(self.item.clone())
    }
}
