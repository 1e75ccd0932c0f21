//! Gateway connection so the bot shows up as online.
//!
//! An interactions-endpoint bot never opens a gateway session on its own, and Discord lists it as
//! offline.  When a bot token is available we keep a minimal session open purely for presence.

use anyhow::Result;
use serenity::all::{Client, Context, EventHandler, GatewayIntents, OnlineStatus, Ready};
use tracing::info;

/// Discord event handler
struct Presence;

#[serenity::async_trait]
impl EventHandler for Presence {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Gateway connected");
        ctx.set_presence(None, OnlineStatus::Online);
    }
}

/// Connect and stay connected until the session ends.
pub async fn run(token: &str) -> Result<()> {
    Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(Presence)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
