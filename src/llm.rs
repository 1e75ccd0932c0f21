use crate::config::Llm;
use thiserror::Error;
use tracing::debug;

/// Longest answer posted as-is.  Discord caps messages at 2000 characters.
pub const MESSAGE_LIMIT: usize = 1900;
const TRUNCATION_MARKER: &str = "…(truncated)";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Missing OPENAI_API_KEY (or YOUR_OPENAI_API_KEY) in environment")]
    MissingApiKey,

    #[error("Question cannot be empty")]
    EmptyPrompt,

    #[error("OpenAI API error ({status}): {detail}")]
    Status { status: u16, detail: String },

    #[error("OpenAI API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Anything that can answer a prompt.
#[serenity::async_trait]
pub trait Complete: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Client for the OpenAI Responses API
pub struct CompletionClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    system: String,
    max_output_tokens: u32,
}

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    /// LLM model name
    model: &'a str,
    /// System instruction followed by the user's prompt
    input: [InputMessage<'a>; 2],
    /// Cap on generated tokens
    max_output_tokens: u32,
}

#[derive(serde::Serialize)]
struct InputMessage<'a> {
    role: Role,
    content: [InputText<'a>; 1],
}

#[derive(serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
}

#[derive(serde::Serialize)]
struct InputText<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(serde::Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    output_text: Option<String>,
}

impl<'a> InputMessage<'a> {
    fn new(role: Role, text: &'a str) -> Self {
        Self {
            role,
            content: [InputText {
                kind: "input_text",
                text,
            }],
        }
    }
}

impl CompletionClient {
    pub fn new(cfg: &Llm) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: cfg.url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            system: cfg.system.clone(),
            max_output_tokens: cfg.max_output_tokens,
        }
    }
}

#[serenity::async_trait]
impl Complete for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(CompletionError::EmptyPrompt);
        }

        let request = CompletionRequest {
            model: &self.model,
            input: [
                InputMessage::new(Role::System, &self.system),
                InputMessage::new(Role::User, prompt),
            ],
            max_output_tokens: self.max_output_tokens,
        };

        debug!(url = %self.url, model = %self.model, "Sending completion request");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(CompletionError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let response = response.json::<CompletionResponse>().await?;
        debug!(url = %self.url, "Completion request done");

        Ok(truncate_for_discord(
            &response.output_text.unwrap_or_default(),
        ))
    }
}

/// Fit text into a single Discord message, marking it when something was cut off.
pub fn truncate_for_discord(text: &str) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text.to_string();
    }

    let keep = MESSAGE_LIMIT - TRUNCATION_MARKER.chars().count();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
