use crate::adapters::{SupabaseAuthClient, SupabaseSessionProvider};
use crate::app::responses::{action_response, page_load_response};
use crate::config::AppConfig;
use crate::core::action::RegisterAction;
use crate::core::guard::load_register_page;
use crate::domain::model::{RegistrationSubmission, RequestContext};
use crate::domain::ports::{AuthBackend, SessionProvider};
use crate::utils::error::Result;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Response,
    routing::get,
    Form, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const REGISTER_PATH: &str = "/register";

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<dyn SessionProvider>,
    action: RegisterAction,
    legacy_message_key: bool,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        backend: Arc<dyn AuthBackend>,
        legacy_message_key: bool,
    ) -> Self {
        Self {
            sessions,
            action: RegisterAction::new(backend),
            legacy_message_key,
        }
    }

    /// 依設定建立 Supabase 相容的協作者
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let sessions = SupabaseSessionProvider::new(config, config.cookie_name())?;
        let backend = SupabaseAuthClient::new(config)?;
        Ok(Self::new(
            Arc::new(sessions),
            Arc::new(backend),
            config.legacy_message_key(),
        ))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // `POST /register?/register` 也會落在這裡
        .route(REGISTER_PATH, get(load_page).post(register))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn request_context(headers: &HeaderMap) -> RequestContext {
    let mut ctx = RequestContext::new();
    for value in headers.get_all(header::COOKIE) {
        if let Ok(cookies) = value.to_str() {
            ctx = ctx.with_cookie_header(cookies);
        }
    }
    if let Some(authorization) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_authorization_header(authorization);
    }
    ctx
}

async fn load_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let ctx = request_context(&headers);
    let load = load_register_page(state.sessions.as_ref(), &ctx).await?;
    Ok(page_load_response(load))
}

async fn register(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let submission = RegistrationSubmission::from_pairs(pairs);
    let outcome = state.action.register(submission).await;
    action_response(outcome, state.legacy_message_key)
}
