//! Editing the original response of an interaction after the webhook has been answered.

use crate::config::Discord;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Discord API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Discord API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Whether to send the bot token along with a request.
///
/// Interaction webhooks are authorized by their token alone, so edits usually go without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// Adds `Authorization: Bot <token>` for edits outside an interaction's lifetime.  No current
    /// call site needs it.
    #[allow(dead_code)]
    Bot,
    Omit,
}

/// Anything that can replace the content of an interaction's original response.
#[serenity::async_trait]
pub trait EditOriginal: Send + Sync {
    async fn edit_original(
        &self,
        application_id: &str,
        token: &str,
        content: &str,
        auth: Authorization,
    ) -> Result<(), NotifyError>;
}

pub struct FollowupNotifier {
    http: reqwest::Client,
    api_base: String,
    bot_token: Option<String>,
}

#[derive(serde::Serialize)]
struct EditMessage<'a> {
    content: &'a str,
}

impl FollowupNotifier {
    pub fn new(cfg: &Discord) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            bot_token: cfg.bot_token.clone(),
        }
    }
}

#[serenity::async_trait]
impl EditOriginal for FollowupNotifier {
    async fn edit_original(
        &self,
        application_id: &str,
        token: &str,
        content: &str,
        auth: Authorization,
    ) -> Result<(), NotifyError> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_base, application_id, token
        );

        let mut request = self
            .http
            .patch(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&EditMessage { content });
        if let (Authorization::Bot, Some(bot_token)) = (auth, &self.bot_token) {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bot {bot_token}"));
        }

        debug!(%application_id, "Editing original interaction response");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
