//! Test doubles shared by the unit tests.

use crate::{
    config::{Config, Discord},
    context::Context,
    followup::{Authorization, EditOriginal, NotifyError},
    llm::{Complete, CompletionError},
};
use ed25519_dalek::{Signer, SigningKey};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Signing half of an application's key pair.
pub struct TestKey(SigningKey);

impl TestKey {
    pub fn new() -> Self {
        Self(SigningKey::from_bytes(&[7; 32]))
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.0.verifying_key().to_bytes())
    }

    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let message = [timestamp.as_bytes(), body].concat();
        hex::encode(self.0.sign(&message).to_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Complete(String),
    Edit {
        application_id: String,
        token: String,
        content: String,
    },
}

/// Shared log of outbound calls, in the order they happened.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    changed: Arc<Notify>,
}

impl Recorder {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        self.changed.notify_one();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until at least `n` calls were recorded.
    pub async fn wait_for(&self, n: usize) -> Vec<Call> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if self.calls.lock().unwrap().len() >= n {
                    return;
                }
                self.changed.notified().await;
            }
        })
        .await
        .expect("timed out waiting for outbound calls");
        self.calls()
    }
}

pub struct FakeCompletion {
    pub recorder: Recorder,
    /// `Err` holds the body of a simulated 500 response.
    pub answer: Result<String, String>,
}

#[serenity::async_trait]
impl Complete for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.recorder.push(Call::Complete(prompt.to_string()));
        self.answer.clone().map_err(|detail| CompletionError::Status {
            status: 500,
            detail,
        })
    }
}

pub struct FakeNotifier {
    pub recorder: Recorder,
    pub fail: bool,
}

#[serenity::async_trait]
impl EditOriginal for FakeNotifier {
    async fn edit_original(
        &self,
        application_id: &str,
        token: &str,
        content: &str,
        _auth: Authorization,
    ) -> Result<(), NotifyError> {
        self.recorder.push(Call::Edit {
            application_id: application_id.to_string(),
            token: token.to_string(),
            content: content.to_string(),
        });
        if self.fail {
            return Err(NotifyError::Status {
                status: 404,
                body: "Unknown Webhook".to_string(),
            });
        }
        Ok(())
    }
}

/// Context wired to recording fakes, with `key` configured as the application's public key.
pub fn test_context(key: &TestKey, answer: Result<&str, &str>) -> (Context, Recorder) {
    let recorder = Recorder::default();
    let cfg = Config {
        discord: Discord {
            public_key: Some(key.public_hex()),
            application_id: Some("APP".to_string()),
            ..Discord::default()
        },
        ..Config::default()
    };
    let completion = Arc::new(FakeCompletion {
        recorder: recorder.clone(),
        answer: answer.map(str::to_string).map_err(str::to_string),
    });
    let notifier = Arc::new(FakeNotifier {
        recorder: recorder.clone(),
        fail: false,
    });

    let ctx = Context::with_clients(cfg, completion, notifier).expect("test context");
    (ctx, recorder)
}
