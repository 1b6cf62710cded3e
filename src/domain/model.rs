use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_PASSWORD_CONFIRM: &str = "passwordConfirm";

/// 單次請求送出的註冊表單，欄位皆可能缺漏
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSubmission {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl RegistrationSubmission {
    /// 從表單鍵值對建立；同一鍵重複時只取第一個值，未知欄位忽略
    ///
    /// 重複鍵取第一個值是對外約定，呼叫端不應依賴最後一個值。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                FIELD_EMAIL => &mut submission.email,
                FIELD_USERNAME => &mut submission.username,
                FIELD_PASSWORD => &mut submission.password,
                FIELD_PASSWORD_CONFIRM => &mut submission.password_confirm,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        submission
    }

    /// 驗證失敗時回傳給前端重新填表的欄位，密碼永遠不回傳
    pub fn echoed_fields(&self) -> EchoedFields {
        EchoedFields {
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

impl ValidRegistration {
    pub fn credentials(&self) -> SignUpCredentials {
        SignUpCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// 欄位名稱對應到依序排列的錯誤訊息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignUpCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 認證服務建立帳號後回傳的摘要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user_id: Option<String>,
    pub email: Option<String>,
    /// 需要信箱確認時服務不會直接發 session
    pub session_issued: bool,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub email: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// 請求層級的環境資訊：目前只需要 cookie 與 Authorization 標頭
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cookies: HashMap<String, String>,
    bearer_token: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie_header(mut self, header: &str) -> Self {
        for pair in header.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    self.cookies
                        .entry(name.to_string())
                        .or_insert_with(|| value.trim().trim_matches('"').to_string());
                }
            }
        }
        self
    }

    pub fn with_authorization_header(mut self, header: &str) -> Self {
        let header = header.trim();
        if let Some(token) = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
        {
            let token = token.trim();
            if !token.is_empty() {
                self.bearer_token = Some(token.to_string());
            }
        }
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}
