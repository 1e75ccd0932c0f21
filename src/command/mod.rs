use crate::{
    context::Context,
    interaction::{CommandData, Interaction, InteractionResponse},
};
use serenity::all::{CreateCommand, InstallationContext, InteractionContext};

mod ask;
mod hello;

pub use ask::AskJob;

/// Slash commands the bot knows how to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Test,
    Hello,
    Ask,
}

/// How a command answers the webhook.
pub enum Reply {
    /// Complete answer, sent as the webhook response.
    Immediate(InteractionResponse),
    /// Acknowledge now, edit the original response once the job finishes.
    Deferred(AskJob),
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Test, Command::Hello, Command::Ask];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Test => test::NAME,
            Command::Hello => hello::NAME,
            Command::Ask => ask::NAME,
        }
    }

    /// Definition uploaded to Discord by `askbot register`.  Every command is usable from guild
    /// and user installs, in guilds, bot DMs and group DMs.
    pub fn registration(self) -> CreateCommand {
        let command = match self {
            Command::Test => test::registration(),
            Command::Hello => hello::registration(),
            Command::Ask => ask::registration(),
        };
        command
            .integration_types(vec![InstallationContext::Guild, InstallationContext::User])
            .contexts(vec![
                InteractionContext::Guild,
                InteractionContext::BotDm,
                InteractionContext::PrivateChannel,
            ])
    }

    /// Answer the webhook.  Must not touch the network; anything slow belongs in a deferred job.
    pub fn run(self, ctx: &Context, interaction: &Interaction, data: &CommandData) -> Reply {
        match self {
            Command::Test => Reply::Immediate(test::respond()),
            Command::Hello => Reply::Immediate(hello::respond()),
            Command::Ask => Reply::Deferred(AskJob::new(ctx, interaction, data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(command));
        }
        assert_eq!(Command::from_name("challenge"), None);
        assert_eq!(Command::from_name("ASK"), None);
    }

    #[test]
    fn registrations_use_command_names() {
        for command in Command::ALL {
            let json = serde_json::to_value(command.registration()).unwrap();
            assert_eq!(json["name"], command.name());
            assert!(json["description"].as_str().is_some_and(|d| !d.is_empty()));
            assert_eq!(json["integration_types"], serde_json::json!([0, 1]));
            assert_eq!(json["contexts"], serde_json::json!([0, 1, 2]));
        }
    }
}
