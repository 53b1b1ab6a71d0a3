use anyhow::{Context, Result};

const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "pdf,docx,doc";
/// Room for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_file_size: match std::env::var("MAX_FILE_SIZE") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_FILE_SIZE must be a byte count")?,
                Err(_) => DEFAULT_MAX_FILE_SIZE,
            },
            allowed_extensions: parse_extensions(
                &std::env::var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
        })
    }

    /// Request body limit for the router: the file limit plus multipart framing.
    /// Uploads between `max_file_size` and this limit are rejected by the handler.
    pub fn body_limit(&self) -> usize {
        self.max_file_size.saturating_add(MULTIPART_OVERHEAD)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions_normalizes() {
        assert_eq!(
            parse_extensions(" PDF, .docx ,,doc"),
            vec!["pdf".to_string(), "docx".to_string(), "doc".to_string()]
        );
    }

    #[test]
    fn test_body_limit_adds_overhead() {
        let config = Config {
            anthropic_api_key: "test".to_string(),
            port: 8000,
            rust_log: "info".to_string(),
            max_file_size: 1024,
            allowed_extensions: vec!["pdf".to_string()],
        };
        assert_eq!(config.body_limit(), 1024 + MULTIPART_OVERHEAD);
    }
}
