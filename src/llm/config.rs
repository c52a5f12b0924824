//! Upstream provider configuration

/// Default `OpenAI`-compatible API root
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Model every story turn is written by
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite-preview-06-17";

const DEFAULT_REFERER: &str = "editid.uk";
const DEFAULT_TITLE: &str = "Editid Story";

/// Configuration for the upstream completions provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Site URL sent as `HTTP-Referer` for provider attribution
    pub referer: String,
    /// Site title sent as `X-Title`
    pub title: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset
    #[must_use]
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: var("OPENROUTER_API_KEY"),
            base_url: var("STORY_UPSTREAM_URL").unwrap_or(defaults.base_url),
            model: var("STORY_MODEL").unwrap_or(defaults.model),
            referer: var("STORY_REFERER").unwrap_or(defaults.referer),
            title: var("STORY_TITLE").unwrap_or(defaults.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_env() {
        let config = LlmConfig::from_vars(|_| None);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.referer, "editid.uk");
        assert_eq!(config.title, "Editid Story");
    }

    #[test]
    fn test_overrides_from_env() {
        let vars: HashMap<&str, &str> = [
            ("OPENROUTER_API_KEY", "sk-test"),
            ("STORY_MODEL", "openai/gpt-4o-mini"),
            ("STORY_UPSTREAM_URL", ""),
        ]
        .into_iter()
        .collect();

        let config = LlmConfig::from_vars(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        // Empty values fall back to defaults
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
