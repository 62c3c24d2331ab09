use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::delivery::smtp::{SmtpConfig, DEFAULT_SMTP_HOST};
use crate::llm_client::LlmConfig;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    /// `None` when `SMTP_HOST` is set but empty: mail delivery is switched off.
    pub smtp: Option<SmtpConfig>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GROQ_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("Required environment variable 'GROQ_API_KEY' is not set");
        }

        let timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 120,
        };

        let mut llm = LlmConfig::new(api_key);
        llm.timeout = Duration::from_secs(timeout_secs);
        if let Some(model) = lookup("LLM_MODEL") {
            llm.model = model;
        }
        if let Some(api_url) = lookup("LLM_API_URL") {
            llm.api_url = api_url;
        }

        let smtp_host = lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let smtp = if smtp_host.trim().is_empty() {
            None
        } else {
            let mut smtp = SmtpConfig::new(smtp_host.trim());
            if let Some(port) = lookup("SMTP_PORT") {
                smtp.port = port
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?;
            }
            if let Some(secs) = lookup("SMTP_TIMEOUT_SECS") {
                smtp.timeout = Duration::from_secs(
                    secs.parse::<u64>()
                        .context("SMTP_TIMEOUT_SECS must be a whole number of seconds")?,
                );
            }
            Some(smtp)
        };

        Ok(Config {
            llm,
            smtp,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
