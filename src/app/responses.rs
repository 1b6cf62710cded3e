use crate::core::action::ActionOutcome;
use crate::core::guard::PageLoad;
use crate::utils::error::RegisterError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

const MESSAGE_KEY: &str = "message";
const LEGACY_MESSAGE_KEY: &str = "messeage";

fn status_or_500(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn redirect(status: u16, location: &str) -> Response {
    (status_or_500(status), [(header::LOCATION, location.to_string())]).into_response()
}

pub fn page_load_response(load: PageLoad) -> Response {
    match load {
        PageLoad::Redirect { status, location } => redirect(status, &location),
        PageLoad::Render => Json(json!({})).into_response(),
    }
}

pub fn action_response(outcome: ActionOutcome, legacy_message_key: bool) -> Response {
    match outcome {
        ActionOutcome::Redirect { status, location } => redirect(status, &location),
        // 表單重新顯示，不帶錯誤狀態碼
        ActionOutcome::Invalid { data, errors } => {
            Json(json!({ "data": data, "errors": errors })).into_response()
        }
        ActionOutcome::Failed { status, message } => {
            let key = if legacy_message_key {
                LEGACY_MESSAGE_KEY
            } else {
                MESSAGE_KEY
            };
            let mut body = Map::new();
            body.insert(key.to_string(), Value::String(message));
            (status_or_500(status), Json(Value::Object(body))).into_response()
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        tracing::error!("❌ Request failed: {}", self);

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(json!({
            "error": {
                "message": "Internal server error",
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
