/// Side panel configuration: API location and notice timing
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://ern-backend-vercel.vercel.app/api/";

/// `<meta name="todo-api-base" content="...">` in the panel page overrides the API base
pub const API_BASE_META: &str = "todo-api-base";

pub const DEFAULT_NOTICE_DURATION_MS: u32 = 3500;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBase { url: String, reason: String },

    #[error("API base URL must use http or https: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub api_base: Url,
    pub notice_duration_ms: u32,
}

impl PanelConfig {
    pub fn new(api_base: Url) -> PanelConfig {
        PanelConfig {
            api_base,
            notice_duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }

    /// Read overrides from the current document, falling back to defaults
    pub fn from_document() -> PanelConfig {
        let override_base = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| {
                doc.query_selector(&format!("meta[name=\"{}\"]", API_BASE_META))
                    .ok()
                    .flatten()
            })
            .and_then(|meta| meta.get_attribute("content"));

        match override_base {
            Some(raw) => match parse_api_base(&raw) {
                Ok(api_base) => PanelConfig::new(api_base),
                Err(e) => {
                    log::warn!("{}; using {}", e, DEFAULT_API_BASE);
                    PanelConfig::default()
                }
            },
            None => PanelConfig::default(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        let api_base = parse_api_base(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL");
        PanelConfig::new(api_base)
    }
}

/// Parse an API base URL, normalizing it to end with a slash so that
/// relative endpoint joins land under it
pub fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBase {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(config.notice_duration_ms, 3500);
    }

    #[test]
    fn test_parse_api_base_adds_trailing_slash() {
        let url = parse_api_base("http://localhost:3000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/");
    }

    #[test]
    fn test_parse_api_base_rejects_garbage() {
        assert!(matches!(
            parse_api_base("not a url"),
            Err(ConfigError::InvalidBase { .. })
        ));
        assert!(matches!(
            parse_api_base("ftp://example.com/api"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }
}
