//! Static provider registry.
//!
//! Each provider names an upstream host, an optional models-listing path for
//! dynamic discovery, and the paths for the proxied capabilities. The
//! registry is loaded once at startup and immutable for the process lifetime.

/// Configuration for one upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Short unique key, used as the namespace prefix in model ids.
    pub key: String,
    /// Human-readable provider name.
    pub name: String,
    /// Upstream domain, no scheme or path.
    pub upstream_host: String,
    /// Path + query for the catalog listing. None means the provider has no
    /// dynamic discovery and contributes no catalog entries.
    pub models_path: Option<String>,
    pub chat_path: Option<String>,
    pub image_path: Option<String>,
}

impl ProviderConfig {
    pub fn new(key: &str, name: &str, upstream_host: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            upstream_host: upstream_host.to_string(),
            models_path: None,
            chat_path: None,
            image_path: None,
        }
    }

    pub fn with_models_path(mut self, path: &str) -> Self {
        self.models_path = Some(path.to_string());
        self
    }

    pub fn with_chat_path(mut self, path: &str) -> Self {
        self.chat_path = Some(path.to_string());
        self
    }

    pub fn with_image_path(mut self, path: &str) -> Self {
        self.image_path = Some(path.to_string());
        self
    }

    /// Base origin for upstream calls. A host that already carries a scheme
    /// is passed through unchanged (lets tests point at a local server).
    pub fn origin(&self) -> String {
        if self.upstream_host.contains("://") {
            self.upstream_host.clone()
        } else {
            format!("https://{}", self.upstream_host)
        }
    }
}

/// The built-in upstream providers, in registry order.
pub fn builtin() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("api.airforce", "Airforce API", "api.airforce")
            .with_chat_path("/v1/chat/completions"),
        ProviderConfig::new("anondrop.net", "AnonDrop", "anondrop.net")
            .with_models_path("/v1/models")
            .with_chat_path("/v1/chat/completions"),
        ProviderConfig::new("gpt4free.pro", "GPT4Free.pro", "gpt4free.pro")
            .with_models_path("/v1/models")
            .with_chat_path("/v1/chat/completions"),
        ProviderConfig::new("gemini", "Google Gemini (via g4f)", "g4f.dev")
            .with_models_path("/api/gemini/models")
            .with_chat_path("/api/gemini/chat/completions"),
        ProviderConfig::new("grok", "Grok (via g4f)", "g4f.dev")
            .with_models_path("/api/grok/models")
            .with_chat_path("/api/grok/chat/completions"),
        ProviderConfig::new("pollinations.ai", "Pollinations.ai (via g4f)", "g4f.dev")
            .with_models_path("/api/pollinations.ai/models")
            .with_chat_path("/api/pollinations.ai/chat/completions")
            .with_image_path("/api/pollinations.ai/images/generations"),
        ProviderConfig::new("ollama", "Ollama (via g4f)", "g4f.dev")
            .with_models_path("/api/ollama/models")
            .with_chat_path("/api/ollama/chat/completions"),
        ProviderConfig::new("huggingface", "HuggingFace (via g4f)", "g4f.dev")
            .with_models_path("/api/huggingface/models?inference=warm&&expand[]=inferenceProviderMapping")
            .with_chat_path("/api/huggingface/chat/completions"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_are_unique() {
        let providers = builtin();
        let mut keys: Vec<&str> = providers.iter().map(|p| p.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), providers.len());
    }

    #[test]
    fn origin_prefixes_https_for_bare_hosts() {
        let p = ProviderConfig::new("p", "P", "example.com");
        assert_eq!(p.origin(), "https://example.com");
    }

    #[test]
    fn origin_passes_through_explicit_schemes() {
        let p = ProviderConfig::new("p", "P", "http://127.0.0.1:8080");
        assert_eq!(p.origin(), "http://127.0.0.1:8080");
    }

    #[test]
    fn airforce_has_no_discovery() {
        let providers = builtin();
        let airforce = providers.iter().find(|p| p.key == "api.airforce").unwrap();
        assert!(airforce.models_path.is_none());
        assert!(airforce.chat_path.is_some());
    }

    #[test]
    fn pollinations_supports_images() {
        let providers = builtin();
        let pollinations = providers
            .iter()
            .find(|p| p.key == "pollinations.ai")
            .unwrap();
        assert!(pollinations.image_path.is_some());
    }
}
