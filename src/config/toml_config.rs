use crate::adapters::DEFAULT_SESSION_COOKIE;
use crate::core::AuthConfigProvider;
use crate::utils::error::{RegisterError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
    pub email_redirect_to: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// 舊版前端讀的是拼錯的 `messeage` 欄位
    pub legacy_message_key: Option<bool>,
}

impl AppConfig {
    pub fn new(auth_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig {
                url: auth_url.into(),
                anon_key: anon_key.into(),
                email_redirect_to: None,
                timeout_seconds: None,
            },
            session: SessionConfig::default(),
            response: ResponseConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegisterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegisterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegisterError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn cookie_name(&self) -> &str {
        self.session
            .cookie_name
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_COOKIE)
    }

    pub fn legacy_message_key(&self) -> bool {
        self.response.legacy_message_key.unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("auth.url", &self.auth.url)?;
        validate_non_empty_string("auth.anon_key", &self.auth.anon_key)?;
        if let Some(redirect_to) = &self.auth.email_redirect_to {
            validate_url("auth.email_redirect_to", redirect_to)?;
        }
        if let Some(timeout) = self.auth.timeout_seconds {
            validate_range("auth.timeout_seconds", timeout, 1, 300)?;
        }
        validate_socket_addr("server.bind", self.bind())?;
        validate_non_empty_string("session.cookie_name", self.cookie_name())?;

        Ok(())
    }
}

impl AuthConfigProvider for AppConfig {
    fn auth_url(&self) -> &str {
        &self.auth.url
    }

    fn anon_key(&self) -> &str {
        &self.auth.anon_key
    }

    fn email_redirect_to(&self) -> Option<&str> {
        self.auth.email_redirect_to.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.auth.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
