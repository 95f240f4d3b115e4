use std::time::Duration;

use color_eyre::eyre::{WrapErr, eyre};
use reqwest::Url;

pub const API_URL_VAR: &str = "SYNESTHESIA_API_URL";
pub const GALLERY_LIMIT_VAR: &str = "SYNESTHESIA_GALLERY_LIMIT";
pub const REQUEST_TIMEOUT_VAR: &str = "SYNESTHESIA_REQUEST_TIMEOUT_SECS";
pub const VOLUME_VAR: &str = "SYNESTHESIA_VOLUME";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub gallery_limit: usize,
    pub request_timeout: Duration,
    pub volume: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse("http://127.0.0.1:5000/").expect("static url is valid"),
            gallery_limit: 12,
            request_timeout: Duration::from_secs(30),
            volume: 100,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> color_eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to the
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> color_eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(API_URL_VAR) {
            config.api_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup(GALLERY_LIMIT_VAR) {
            let limit: usize = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("{GALLERY_LIMIT_VAR} must be a positive integer"))?;
            if limit == 0 {
                return Err(eyre!("{GALLERY_LIMIT_VAR} must be at least 1"));
            }
            config.gallery_limit = limit;
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("{REQUEST_TIMEOUT_VAR} must be a number of seconds"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(VOLUME_VAR) {
            let volume: u8 = raw
                .trim()
                .parse()
                .ok()
                .filter(|v| *v <= 100)
                .ok_or_else(|| eyre!("{VOLUME_VAR} must be between 0 and 100"))?;
            config.volume = volume;
        }

        Ok(config)
    }
}

// `Url::join` drops the last path segment unless the base ends with a slash.
fn parse_base_url(raw: &str) -> color_eyre::Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).wrap_err_with(|| format!("{API_URL_VAR} is not a valid url: {raw}"))
}
