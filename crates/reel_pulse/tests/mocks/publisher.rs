use std::sync::{Arc, Mutex};

use reel_pulse::{
    publish::{PublishAttempt, Publisher, MEDIA_NOT_READY_MARKER},
    Error,
};

/// Answers the first `transient_attempts` publish calls with the not-ready
/// marker, then succeeds
#[derive(Clone)]
pub struct MockPublisher {
    pub transient_attempts: usize,
    pub containers: Arc<Mutex<Vec<(String, String)>>>,
    pub attempts: Arc<Mutex<usize>>,
    pub fail_create: Option<String>,
    pub reject_with: Option<(u16, String)>,
}

impl MockPublisher {
    pub fn succeeding_after(transient_attempts: usize) -> Self {
        Self {
            transient_attempts,
            containers: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            fail_create: None,
            reject_with: None,
        }
    }

    pub fn failing_create(msg: &str) -> Self {
        Self {
            fail_create: Some(msg.to_string()),
            ..Self::succeeding_after(0)
        }
    }

    /// Every publish call is rejected with `status` and `body`
    pub fn rejecting(status: u16, body: &str) -> Self {
        Self {
            reject_with: Some((status, body.to_string())),
            ..Self::succeeding_after(0)
        }
    }

    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Publisher for MockPublisher {
    async fn create_container(&self, video_url: &str, caption: &str) -> Result<String, Error> {
        self.containers
            .lock()
            .unwrap()
            .push((video_url.to_string(), caption.to_string()));
        if let Some(ref msg) = self.fail_create {
            return Err(Error::PublishCreate {
                status: 400,
                body: msg.clone(),
            });
        }
        Ok("container-7".to_string())
    }

    async fn attempt_publish(&self, _container_id: &str) -> Result<PublishAttempt, Error> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };

        if let Some((status, body)) = &self.reject_with {
            return Ok(PublishAttempt {
                status: *status,
                body: body.clone(),
            });
        }

        if attempt <= self.transient_attempts {
            return Ok(PublishAttempt {
                status: 400,
                body: format!(r#"{{"error":{{"message":"{MEDIA_NOT_READY_MARKER}","code":9007}}}}"#),
            });
        }

        Ok(PublishAttempt {
            status: 200,
            body: r#"{"id":"17900000000000001"}"#.to_string(),
        })
    }
}
