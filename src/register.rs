use crate::{command::Command, config::Config};
use anyhow::{anyhow, ensure, Result};
use serenity::all::{ApplicationId, Command as DiscordCommand, CreateCommand, Http};
use tracing::info;

/// Global command definitions, in registration order.
pub fn definitions() -> Vec<CreateCommand> {
    Command::ALL.into_iter().map(Command::registration).collect()
}

/// Replace the application's global slash commands with the ones this bot handles.
pub async fn register(cfg: &Config) -> Result<()> {
    let token = cfg
        .discord
        .bot_token
        .as_deref()
        .ok_or(anyhow!("Registering commands needs DISCORD_TOKEN (or YOUR_BOT_TOKEN)"))?;
    let application_id = cfg
        .discord
        .application_id
        .as_deref()
        .ok_or(anyhow!("Registering commands needs APP_ID (or YOUR_APP_ID)"))?;
    let application_id: u64 = application_id
        .parse()
        .map_err(|e| anyhow!("Invalid application id `{}`: {}", application_id, e))?;
    ensure!(application_id != 0, "Application id must not be 0");

    let http = Http::new(token);
    http.set_application_id(ApplicationId::new(application_id));

    let registered = DiscordCommand::set_global_commands(&http, definitions()).await?;
    for command in &registered {
        info!(name = %command.name, id = %command.id, "Registered command");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_takes_a_required_question() {
        let defs = serde_json::to_value(definitions()).unwrap();
        let names: Vec<_> = defs
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["test", "hello", "ask"]);

        let question = &defs[2]["options"][0];
        assert_eq!(question["name"], "question");
        assert_eq!(question["type"], 3);
        assert_eq!(question["required"], true);

        for def in defs.as_array().unwrap() {
            assert_eq!(def["integration_types"], serde_json::json!([0, 1]));
            assert_eq!(def["contexts"], serde_json::json!([0, 1, 2]));
        }
    }

    #[tokio::test]
    async fn missing_token_is_reported() {
        let err = register(&Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }
}
