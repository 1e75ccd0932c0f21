//! Interactions endpoint
//!
//! Discord POSTs every slash command invocation here.  Requests are verified, parsed, and handed
//! to the matching [`Command`].  Deferred commands keep running in a detached task after the
//! response has been written.

use crate::{
    command::{AskJob, Command, Reply},
    context::Context,
    error::WebhookError,
    interaction::{Interaction, InteractionResponse, InteractionType},
    verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
};
use axum::{
    body::{Body, Bytes, HttpBody},
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::StreamExt;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(ctx: Context) -> Router {
    let endpoint = post(webhook).fallback(reject_method);

    Router::new()
        .route("/interactions", endpoint.clone())
        .route("/api/interactions", endpoint)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn reject_method() -> WebhookError {
    WebhookError::MethodNotAllowed
}

async fn webhook(
    State(ctx): State<Context>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let header = |name: &'static str| headers.get(name).and_then(|v| v.to_str().ok());

    // The body stays opaque bytes until the signature checks out.
    ctx.verifier()
        .verify(header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER), &body)?;

    let interaction: Interaction =
        serde_json::from_slice(&body).map_err(WebhookError::InvalidJson)?;

    dispatch(&ctx, &interaction)
}

fn dispatch(ctx: &Context, interaction: &Interaction) -> Result<Response, WebhookError> {
    match interaction.kind {
        InteractionType::Ping => Ok(Json(InteractionResponse::pong()).into_response()),
        InteractionType::ApplicationCommand => {
            let data = interaction.command_data();
            let command = Command::from_name(&data.name)
                .ok_or_else(|| WebhookError::UnknownCommand(data.name.clone()))?;

            info!(
                command = command.name(),
                id = interaction.id().unwrap_or_default(),
                "Received command"
            );

            Ok(match command.run(ctx, interaction, &data) {
                Reply::Immediate(response) => Json(response).into_response(),
                Reply::Deferred(job) => defer(ctx.clone(), job),
            })
        }
        InteractionType::Other(kind) => Err(WebhookError::UnknownInteractionType(kind)),
    }
}

/// Signals the paired receiver when dropped.
struct SentGuard(Option<oneshot::Sender<()>>);

impl Drop for SentGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

/// Respond with a deferred acknowledgement and run `job` once it is out.
///
/// Discord refuses edits to an interaction that was never acknowledged.  The job therefore waits
/// until the server drops the response body, which happens after the body was written to the
/// connection (or the connection went away).
fn defer(ctx: Context, job: AskJob) -> Response {
    let (sent_tx, sent) = oneshot::channel();
    let guard = SentGuard(Some(sent_tx));

    let (mut parts, body) = Json(InteractionResponse::deferred())
        .into_response()
        .into_parts();
    if let Some(len) = body.size_hint().exact() {
        parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }
    let body = Body::from_stream(body.into_data_stream().map(move |chunk| {
        let _guard = &guard;
        chunk
    }));

    tokio::spawn(async move {
        let _ = sent.await;
        job.run(ctx.completion(), ctx.notifier()).await;
    });

    Response::from_parts(parts, body)
}
