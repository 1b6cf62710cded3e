use crate::domain::model::{RequestContext, Session, SignUpCredentials, SignUpResponse};
use crate::domain::ports::{AuthBackend, AuthConfigProvider, SessionProvider};
use crate::utils::error::{AuthBackendError, RegisterError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";

fn build_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(client)
}

fn auth_endpoint(base_url: &str, path: &str) -> Result<Url> {
    let raw = format!("{}/auth/v1/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| RegisterError::InvalidConfigValueError {
        field: "auth.url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

/// GoTrue 相容的註冊 API
#[derive(Debug, Clone)]
pub struct SupabaseAuthClient {
    client: Client,
    signup_url: Url,
    anon_key: String,
}

impl SupabaseAuthClient {
    pub fn new<C: AuthConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut signup_url = auth_endpoint(config.auth_url(), "signup")?;
        if let Some(redirect_to) = config.email_redirect_to() {
            signup_url
                .query_pairs_mut()
                .append_pair("redirect_to", redirect_to);
        }

        Ok(Self {
            client: build_client(config.timeout_seconds())?,
            signup_url,
            anon_key: config.anon_key().to_string(),
        })
    }
}

#[async_trait]
impl AuthBackend for SupabaseAuthClient {
    async fn sign_up(
        &self,
        credentials: &SignUpCredentials,
    ) -> std::result::Result<SignUpResponse, AuthBackendError> {
        tracing::debug!("Making sign-up request to: {}", self.signup_url);

        let response = self
            .client
            .post(self.signup_url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Sign-up response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        parse_sign_up_body(&body)
    }
}

/// 服務的錯誤格式不一，依序找 msg / message / error_description
fn api_error(status: StatusCode, body: &str) -> AuthBackendError {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let message = ["msg", "message", "error_description"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    let code = ["error_code", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    AuthBackendError::Api {
        status: status.as_u16(),
        message,
        code,
    }
}

fn parse_sign_up_body(body: &str) -> std::result::Result<SignUpResponse, AuthBackendError> {
    let json: Value = serde_json::from_str(body).map_err(|e| AuthBackendError::Decode {
        message: format!("sign-up body is not JSON: {}", e),
    })?;

    // 自動確認時回傳 session（內含 user），否則直接回傳 user
    let session_issued = json.get("access_token").is_some();
    let user = if session_issued {
        json.get("user").unwrap_or(&Value::Null)
    } else {
        &json
    };

    Ok(SignUpResponse {
        user_id: user.get("id").and_then(Value::as_str).map(str::to_string),
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
        session_issued,
    })
}

/// 以 cookie 或 Bearer token 向認證服務確認 session
#[derive(Debug, Clone)]
pub struct SupabaseSessionProvider {
    client: Client,
    user_url: Url,
    anon_key: String,
    cookie_name: String,
}

impl SupabaseSessionProvider {
    pub fn new<C: AuthConfigProvider + ?Sized>(config: &C, cookie_name: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds())?,
            user_url: auth_endpoint(config.auth_url(), "user")?,
            anon_key: config.anon_key().to_string(),
            cookie_name: cookie_name.to_string(),
        })
    }
}

#[async_trait]
impl SessionProvider for SupabaseSessionProvider {
    async fn get_session(&self, ctx: &RequestContext) -> Result<Option<Session>> {
        let Some(token) = ctx.cookie(&self.cookie_name).or(ctx.bearer_token()) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.user_url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Session token rejected by auth service");
                Ok(None)
            }
            status if status.is_success() => {
                let user: Value = response.json().await?;
                let user_id = user
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RegisterError::SessionError {
                        message: "user response has no id".to_string(),
                    })?;

                Ok(Some(Session {
                    access_token: token.to_string(),
                    user_id: user_id.to_string(),
                    email: user.get("email").and_then(Value::as_str).map(str::to_string),
                }))
            }
            status => Err(RegisterError::SessionError {
                message: format!("auth service returned {}", status),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    struct MockConfig {
        url: String,
        redirect_to: Option<String>,
    }

    impl MockConfig {
        fn new(url: String) -> Self {
            Self {
                url,
                redirect_to: None,
            }
        }
    }

    impl AuthConfigProvider for MockConfig {
        fn auth_url(&self) -> &str {
            &self.url
        }

        fn anon_key(&self) -> &str {
            "anon-key"
        }

        fn email_redirect_to(&self) -> Option<&str> {
            self.redirect_to.as_deref()
        }

        fn timeout_seconds(&self) -> u64 {
            5
        }
    }

    fn credentials() -> SignUpCredentials {
        SignUpCredentials {
            email: "a@b.com".to_string(),
            password: "password1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_sends_credentials_and_api_key() {
        let server = MockServer::start();
        let signup_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/v1/signup")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key")
                .json_body(serde_json::json!({"email": "a@b.com", "password": "password1"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "user-1", "email": "a@b.com"}));
        });

        let client = SupabaseAuthClient::new(&MockConfig::new(server.base_url())).unwrap();
        let response = client.sign_up(&credentials()).await.unwrap();

        signup_mock.assert();
        assert_eq!(response.user_id.as_deref(), Some("user-1"));
        assert_eq!(response.email.as_deref(), Some("a@b.com"));
        assert!(!response.session_issued);
    }

    #[tokio::test]
    async fn test_sign_up_with_session_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/signup");
            then.status(200).json_body(serde_json::json!({
                "access_token": "jwt",
                "user": {"id": "user-2", "email": "a@b.com"}
            }));
        });

        let client = SupabaseAuthClient::new(&MockConfig::new(server.base_url())).unwrap();
        let response = client.sign_up(&credentials()).await.unwrap();

        assert_eq!(response.user_id.as_deref(), Some("user-2"));
        assert!(response.session_issued);
    }

    #[tokio::test]
    async fn test_sign_up_passes_redirect_to() {
        let server = MockServer::start();
        let signup_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/v1/signup")
                .query_param("redirect_to", "https://app.example.com/auth/callback");
            then.status(200).json_body(serde_json::json!({"id": "user-1"}));
        });

        let config = MockConfig {
            url: server.base_url(),
            redirect_to: Some("https://app.example.com/auth/callback".to_string()),
        };
        let client = SupabaseAuthClient::new(&config).unwrap();
        client.sign_up(&credentials()).await.unwrap();

        signup_mock.assert();
    }

    #[tokio::test]
    async fn test_sign_up_api_error_keeps_status_and_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/signup");
            then.status(400).json_body(serde_json::json!({
                "code": 400,
                "error_code": "validation_failed",
                "msg": "Unable to validate email address: invalid format"
            }));
        });

        let client = SupabaseAuthClient::new(&MockConfig::new(server.base_url())).unwrap();
        let err = client.sign_up(&credentials()).await.unwrap_err();

        match err {
            AuthBackendError::Api {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Unable to validate email address: invalid format");
                assert_eq!(code.as_deref(), Some("validation_failed"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_up_error_without_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/signup");
            then.status(502).body("bad gateway");
        });

        let client = SupabaseAuthClient::new(&MockConfig::new(server.base_url())).unwrap();
        let err = client.sign_up(&credentials()).await.unwrap_err();

        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_sign_up_non_json_success_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/signup");
            then.status(200).body("<html></html>");
        });

        let client = SupabaseAuthClient::new(&MockConfig::new(server.base_url())).unwrap();
        let err = client.sign_up(&credentials()).await.unwrap_err();

        assert!(matches!(err, AuthBackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_session_without_token_skips_lookup() {
        let server = MockServer::start();
        let user_mock = server.mock(|when, then| {
            when.method(GET).path("/auth/v1/user");
            then.status(200);
        });

        let provider =
            SupabaseSessionProvider::new(&MockConfig::new(server.base_url()), DEFAULT_SESSION_COOKIE)
                .unwrap();
        let session = provider.get_session(&RequestContext::new()).await.unwrap();

        assert!(session.is_none());
        user_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_session_from_cookie() {
        let server = MockServer::start();
        let user_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/auth/v1/user")
                .header("authorization", "Bearer cookie-token");
            then.status(200)
                .json_body(serde_json::json!({"id": "user-1", "email": "a@b.com"}));
        });

        let provider =
            SupabaseSessionProvider::new(&MockConfig::new(server.base_url()), DEFAULT_SESSION_COOKIE)
                .unwrap();
        let ctx = RequestContext::new().with_cookie_header("sb-access-token=cookie-token");
        let session = provider.get_session(&ctx).await.unwrap().unwrap();

        user_mock.assert();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_rejected_token_means_no_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/auth/v1/user");
            then.status(401)
                .json_body(serde_json::json!({"msg": "invalid JWT"}));
        });

        let provider =
            SupabaseSessionProvider::new(&MockConfig::new(server.base_url()), DEFAULT_SESSION_COOKIE)
                .unwrap();
        let ctx = RequestContext::new().with_authorization_header("Bearer expired");

        assert!(provider.get_session(&ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_lookup_server_error_propagates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/auth/v1/user");
            then.status(500);
        });

        let provider =
            SupabaseSessionProvider::new(&MockConfig::new(server.base_url()), DEFAULT_SESSION_COOKIE)
                .unwrap();
        let ctx = RequestContext::new().with_authorization_header("Bearer token");
        let result = provider.get_session(&ctx).await;

        assert!(matches!(result, Err(RegisterError::SessionError { .. })));
    }
}
