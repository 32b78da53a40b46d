//! JSON handlers for the bot API

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::AppError;
use crate::managers::{CreateBotRequest, SharedBotManager, BOT_CREATED_MESSAGE, BOT_VERIFIED_MESSAGE};
use crate::state::{BotRecord, UserInfo};

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub bots: SharedBotManager,
}

/// Body of `POST /api/bots`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBotBody {
    pub username: Option<String>,
    #[serde(default)]
    pub is_private: Value,
    pub user_id: Option<String>,
}

impl From<CreateBotBody> for CreateBotRequest {
    fn from(body: CreateBotBody) -> Self {
        Self {
            username: body.username,
            is_private: is_truthy(&body.is_private),
            user_id: body.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBotResponse {
    pub message: String,
    pub bot: BotRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// JSON truthiness of a request flag
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// GET /api/user
pub async fn get_user(State(state): State<ApiState>) -> Json<UserInfo> {
    Json(state.bots.get_user_info().await)
}

/// GET /api/bots
pub async fn list_bots(State(state): State<ApiState>) -> Json<Vec<BotRecord>> {
    Json(state.bots.get_bots().await)
}

/// POST /api/bots
pub async fn create_bot(
    State(state): State<ApiState>,
    body: Result<Json<CreateBotBody>, JsonRejection>,
) -> Result<Json<CreateBotResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let bot = state.bots.create_bot(body.into()).await?;

    Ok(Json(CreateBotResponse {
        message: BOT_CREATED_MESSAGE.to_string(),
        bot,
    }))
}

/// POST /api/bots/verify/:bot_id
pub async fn verify_bot(
    State(state): State<ApiState>,
    Path(bot_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.bots.verify_bot(&bot_id).await?;

    Ok(Json(MessageResponse {
        message: BOT_VERIFIED_MESSAGE.to_string(),
    }))
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match &err {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "request failed");
        }
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}
