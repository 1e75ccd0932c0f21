//! `/ask`: forward a question to the LLM and post the answer.
//!
//! Completions take far longer than the three seconds Discord waits for a webhook response, so the
//! command answers in two phases.  The webhook gets a deferred acknowledgement immediately, and an
//! [`AskJob`] later replaces that "thinking" message through the follow-up endpoint.

use crate::{
    context::Context,
    error::AskError,
    followup::{Authorization, EditOriginal},
    interaction::{CommandData, Interaction},
    llm::Complete,
};
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};
use tracing::{error, info, warn};

pub const NAME: &str = "ask";
const QUESTION: &str = "question";
/// Posted when the model answers with nothing at all
const EMPTY_ANSWER: &str = "(No output)";

pub fn registration() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Ask the bot a question (AI)")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, QUESTION, "What do you want to ask?")
                .required(true),
        )
}

/// Deferred half of an `/ask` invocation
#[derive(Debug)]
pub struct AskJob {
    application_id: Option<String>,
    token: Option<String>,
    question: String,
}

impl AskJob {
    /// Capture everything the job needs.  Nothing is validated yet; a missing question becomes an
    /// empty one and is rejected by the completion client.
    pub fn new(ctx: &Context, interaction: &Interaction, data: &CommandData) -> Self {
        Self {
            application_id: ctx
                .cfg()
                .discord
                .application_id
                .clone()
                .filter(|id| !id.is_empty()),
            token: interaction
                .token()
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            question: data.option_text(QUESTION),
        }
    }

    /// Produce the answer and edit it into the original response.
    ///
    /// Never fails: errors are logged and, where possible, shown to the user in place of the
    /// answer.
    pub async fn run(self, completion: &dyn Complete, notifier: &dyn EditOriginal) {
        match self.answer(completion, notifier).await {
            Ok(()) => info!(question_len = self.question.len(), "Answered ask command"),
            Err(err) => {
                error!(error = %err, "Ask command failed");
                self.report(notifier, &err).await;
            }
        }
    }

    async fn answer(
        &self,
        completion: &dyn Complete,
        notifier: &dyn EditOriginal,
    ) -> Result<(), AskError> {
        let application_id = self
            .application_id
            .as_deref()
            .ok_or(AskError::MissingApplicationId)?;
        let token = self.token.as_deref().ok_or(AskError::MissingToken)?;

        let answer = completion.complete(&self.question).await?;
        let content = if answer.is_empty() {
            EMPTY_ANSWER
        } else {
            answer.as_str()
        };

        notifier
            .edit_original(application_id, token, content, Authorization::Omit)
            .await?;
        Ok(())
    }

    /// Best effort: a failure here is logged and dropped.
    async fn report(&self, notifier: &dyn EditOriginal, err: &AskError) {
        let (Some(application_id), Some(token)) = (&self.application_id, &self.token) else {
            warn!(error = %err, "No interaction to report ask failure to");
            return;
        };

        let content = format!("Error: {err}");
        match notifier
            .edit_original(application_id, token, &content, Authorization::Omit)
            .await
        {
            Ok(()) => info!("Reported ask failure to user"),
            Err(report_err) => warn!(
                error = %report_err,
                original_error = %err,
                "Could not report ask failure to user"
            ),
        }
    }
}
