use anyhow::{Context, Result};
use dotenvy::dotenv;
use jsonblob_client::DEFAULT_BASE_URL;
use secret_santa::Language;
use std::env;
use std::path::PathBuf;
use url::Url;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub blob_url: String,
    pub local_dir: PathBuf,
    pub share_url: Url,
    pub offline: bool,
    pub openai_api_key: Option<String>,
    pub suggest_model: String,
    pub language: Language,
    pub session_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let local_dir = PathBuf::from(
            env::var("SANTA_LOCAL_DIR").unwrap_or_else(|_| ".santa".to_string()),
        );
        let session_file = env::var("SANTA_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| local_dir.join("session.json"));

        Ok(Self {
            blob_url: env::var("SANTA_BLOB_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            share_url: Url::parse(
                &env::var("SANTA_SHARE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/".to_string()),
            )
            .context("SANTA_SHARE_URL must be a valid URL")?,
            offline: parse_bool(env::var("SANTA_OFFLINE").ok().as_deref())
                .context("SANTA_OFFLINE must be true or false")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            suggest_model: env::var("SANTA_SUGGEST_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            language: env::var("SANTA_LANG")
                .ok()
                .map(|l| l.parse::<Language>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("SANTA_LANG must be one of en, zh, ja, ko, es")?
                .unwrap_or_default(),
            local_dir,
            session_file,
        })
    }
}

fn parse_bool(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v.is_empty() || v == "0" || v == "false" || v == "no" => Ok(false),
        Some(v) if v == "1" || v == "true" || v == "yes" => Ok(true),
        Some(v) => anyhow::bail!("invalid boolean: {v}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(!parse_bool(None).unwrap());
        assert!(!parse_bool(Some("false")).unwrap());
        assert!(parse_bool(Some("TRUE")).unwrap());
        assert!(parse_bool(Some(" yes ")).unwrap());
        assert!(parse_bool(Some("maybe")).is_err());
    }
}
