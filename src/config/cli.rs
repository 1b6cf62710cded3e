use crate::config::{AppConfig, CliConfig};
use crate::utils::error::{RegisterError, Result};
use crate::utils::validation::Validate;

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                AppConfig::from_file(path)?
            }
            None => {
                let url = self.supabase_url.clone().ok_or_else(|| {
                    RegisterError::MissingConfigError {
                        field: "supabase_url".to_string(),
                    }
                })?;
                let anon_key = self.supabase_anon_key.clone().ok_or_else(|| {
                    RegisterError::MissingConfigError {
                        field: "supabase_anon_key".to_string(),
                    }
                })?;
                AppConfig::new(url, anon_key)
            }
        };

        if let Some(url) = &self.supabase_url {
            config.auth.url = url.clone();
        }
        if let Some(anon_key) = &self.supabase_anon_key {
            config.auth.anon_key = anon_key.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = Some(bind.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli() -> CliConfig {
        CliConfig {
            config: None,
            bind: None,
            supabase_url: None,
            supabase_anon_key: None,
            verbose: false,
            json_logs: false,
        }
    }

    #[test]
    fn test_flags_without_file() {
        let mut args = cli();
        args.supabase_url = Some("https://project.supabase.co".to_string());
        args.supabase_anon_key = Some("key".to_string());
        args.bind = Some("127.0.0.1:4000".to_string());

        let config = args.load_app_config().unwrap();
        assert_eq!(config.auth.url, "https://project.supabase.co");
        assert_eq!(config.bind(), "127.0.0.1:4000");
    }

    #[test]
    fn test_missing_url_is_reported() {
        let result = cli().load_app_config();
        assert!(matches!(
            result,
            Err(RegisterError::MissingConfigError { field }) if field == "supabase_url"
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[server]
bind = "127.0.0.1:3000"

[auth]
url = "https://file.supabase.co"
anon_key = "file-key"
"#,
            )
            .unwrap();

        let mut args = cli();
        args.config = Some(temp_file.path().to_path_buf());
        args.supabase_anon_key = Some("flag-key".to_string());

        let config = args.load_app_config().unwrap();
        assert_eq!(config.auth.url, "https://file.supabase.co");
        assert_eq!(config.auth.anon_key, "flag-key");
        assert_eq!(config.bind(), "127.0.0.1:3000");
    }
}
