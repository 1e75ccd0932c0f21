use crate::interaction::InteractionResponse;
use serenity::all::CreateCommand;

pub const NAME: &str = "hello";

pub fn registration() -> CreateCommand {
    CreateCommand::new(NAME).description("Prints Hello world!")
}

pub fn respond() -> InteractionResponse {
    InteractionResponse::message("Hello world!")
}
