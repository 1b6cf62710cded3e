use crate::domain::model::SignUpCredentials;
use crate::domain::ports::AuthBackend;
use crate::utils::error::AuthBackendError;

pub const MSG_INVALID_CREDENTIALS: &str = "invalid email or password.";
pub const MSG_SERVER_ERROR: &str = "Server error, please try again later.";

pub const REDIRECT_AFTER_SIGN_UP: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirect { status: u16, location: String },
    Failed { status: u16, message: String },
}

/// 呼叫一次認證服務建立帳號，不重試
pub async fn submit_registration(
    backend: &dyn AuthBackend,
    credentials: &SignUpCredentials,
) -> SubmitOutcome {
    tracing::debug!("Submitting sign-up for {}", credentials.email);

    match backend.sign_up(credentials).await {
        Ok(response) => {
            tracing::info!(
                "✅ Account created (user: {}, session issued: {})",
                response.user_id.as_deref().unwrap_or("unknown"),
                response.session_issued
            );
            SubmitOutcome::Redirect {
                status: 303,
                location: REDIRECT_AFTER_SIGN_UP.to_string(),
            }
        }
        Err(err) => {
            let outcome = failure_for(&err);
            // 細節只寫進日誌，不回傳給使用者
            tracing::warn!("❌ Sign-up rejected: {}", err);
            outcome
        }
    }
}

fn failure_for(err: &AuthBackendError) -> SubmitOutcome {
    // 只有服務明確回 400 才算使用者輸入問題
    match err.status() {
        Some(400) => SubmitOutcome::Failed {
            status: 400,
            message: MSG_INVALID_CREDENTIALS.to_string(),
        },
        _ => SubmitOutcome::Failed {
            status: 500,
            message: MSG_SERVER_ERROR.to_string(),
        },
    }
}
