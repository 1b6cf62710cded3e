use crate::domain::model::{RequestContext, Session, SignUpCredentials, SignUpResponse};
use crate::utils::error::{AuthBackendError, Result};
use async_trait::async_trait;

/// 查詢目前請求是否已有登入 session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, ctx: &RequestContext) -> Result<Option<Session>>;
}

/// 外部認證服務：以 email + 密碼建立帳號
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_up(
        &self,
        credentials: &SignUpCredentials,
    ) -> std::result::Result<SignUpResponse, AuthBackendError>;
}

pub trait AuthConfigProvider: Send + Sync {
    fn auth_url(&self) -> &str;
    fn anon_key(&self) -> &str;
    fn email_redirect_to(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}
