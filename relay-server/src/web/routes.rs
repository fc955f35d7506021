//! HTTP route handlers.

use std::collections::BTreeMap;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::chat::ChatError;
use crate::line::{LineError, WebhookBody};
use crate::pubsub::PubSubError;
use crate::transit::TransitError;
use crate::voice::{VoiceError, VoiceMessage};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nextrain", get(next_train))
        .route("/chat", get(chat_page).post(chat_submit))
        .route("/voice", get(voice_relay))
        .route("/pubsub", get(publish))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })
}

/// Time until the next train between two stations.
async fn next_train(
    State(state): State<AppState>,
    Query(req): Query<NextTrainRequest>,
) -> Result<Response, AppError> {
    info!(?req, "next train request");
    let res_type = ResponseType::from_param(req.res_type.as_deref());

    let (Some(from), Some(to)) = (non_empty(req.from), non_empty(req.to)) else {
        return Err(AppError::BadRequest {
            message: "Please set from and to parameters.".to_string(),
        });
    };

    let now = Utc::now().with_timezone(&state.time_zone);
    let next = state.transit.find(&from, &to, now).await?;
    info!(from = %from, to = %to, next_time = %next.time_of_day(), countdown = %next.countdown, "found next train");

    let response = match res_type {
        ResponseType::Normal => next.countdown.to_string().into_response(),
        ResponseType::Verbose => Json(NextTrainVerbose::new(&from, &to, &next)).into_response(),
    };
    Ok(response)
}

/// Empty chat form.
async fn chat_page() -> Result<Html<String>, AppError> {
    render(&ChatTemplate {
        question: String::new(),
        answer: String::new(),
    })
}

/// Ask the chat API and show the answer.
async fn chat_submit(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, AppError> {
    let Some(question) = non_empty(form.question) else {
        return chat_page().await;
    };
    info!(question = %question, "chat request");

    let chat = state.chat.as_ref().ok_or_else(|| AppError::NotConfigured {
        message: "chat API key is not configured.".to_string(),
    })?;
    let answer = chat.ask(&question).await?;

    render(&ChatTemplate { question, answer })
}

/// Send a voice message when speaker and message are both given.
async fn voice_relay(
    State(state): State<AppState>,
    Query(req): Query<VoiceRequest>,
) -> Result<Html<String>, AppError> {
    info!(?req, "voice request");
    let mut feedback = String::new();

    if let (Some(speaker), Some(message)) = (non_empty(req.speaker), non_empty(req.message)) {
        let voice = state.voice.as_ref().ok_or_else(|| AppError::NotConfigured {
            message: "voice relay token is not configured.".to_string(),
        })?;
        voice.send(&VoiceMessage::new(speaker, message)).await?;
        feedback = "Message successfully sent.".to_string();
    }

    render(&VoiceTemplate { feedback })
}

/// Publish all query parameters as a JSON message to `topic`.
async fn publish(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<String, AppError> {
    info!(?params, "publish request");

    let pubsub = state.pubsub.as_ref().ok_or_else(|| AppError::NotConfigured {
        message: "Project ID is not configured.".to_string(),
    })?;

    let topic = params
        .get("topic")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "Topic parameter is missing.".to_string(),
        })?;

    let message_id = pubsub.publish(topic, &params).await?;
    let result = format!("Topic: {topic}, Result: {message_id}");
    info!("{result}");

    Ok(result)
}

/// Echo LINE webhook messages back to where they came from.
async fn webhook(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    info!(body = %String::from_utf8_lossy(&body), "webhook request");

    match serde_json::from_slice::<WebhookBody>(&body) {
        Ok(parsed) => {
            for event in &parsed.events {
                let Some(reply) = event.echo()? else {
                    info!("skipping event without text, target or reply token");
                    continue;
                };
                let line = state.line.as_ref().ok_or_else(|| AppError::NotConfigured {
                    message: "LINE channel token is not configured.".to_string(),
                })?;
                line.reply(&reply.reply_token, &reply.text).await?;
            }
        }
        Err(e) => info!(error = %e, "no events found in the request body"),
    }

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    NotConfigured { message: String },
    Internal { message: String },
}

impl From<TransitError> for AppError {
    fn from(e: TransitError) -> Self {
        match e {
            TransitError::NotFound => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<VoiceError> for AppError {
    fn from(e: VoiceError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<PubSubError> for AppError {
    fn from(e: PubSubError) -> Self {
        match e {
            PubSubError::InvalidTopic(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<LineError> for AppError {
    fn from(e: LineError) -> Self {
        match e {
            LineError::UnknownSourceType(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::NotConfigured { message } | AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        error!(%status, "{message}");

        (status, format!("Error occurred. <{message}>")).into_response()
    }
}
