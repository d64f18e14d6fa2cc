//! Built-in endpoint presets for well-known OAuth2 providers.

mod facebook;
mod github;
mod google;

use crate::OAuthError;
use crate::client::ProviderConfig;

/// A provider's static endpoint set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub key: &'static str,
    pub auth_endpoint: &'static str,
    pub token_endpoint: &'static str,
    pub active_user_endpoint: Option<&'static str>,
}

impl ProviderEndpoints {
    /// Stamps out a full configuration with application credentials.
    pub fn config(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ProviderConfig {
        let mut config = ProviderConfig::new(
            self.auth_endpoint,
            self.token_endpoint,
            client_id,
            client_secret,
        );
        if let Some(endpoint) = self.active_user_endpoint {
            config = config.with_active_user_endpoint(endpoint);
        }
        config
    }
}

/// Looks up a built-in provider preset by key.
pub fn by_key(key: &str) -> Result<&'static ProviderEndpoints, OAuthError> {
    match key {
        "facebook" => Ok(&facebook::ENDPOINTS),
        "github" => Ok(&github::ENDPOINTS),
        "google" => Ok(&google::ENDPOINTS),
        _ => Err(OAuthError::ProviderNotFound {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::by_key;

    #[test]
    fn by_key_resolves_builtin_providers() {
        for key in ["facebook", "github", "google"] {
            let preset = by_key(key).unwrap();
            assert_eq!(preset.key, key);
        }
    }

    #[test]
    fn by_key_reports_unknown_providers() {
        let err = by_key("gitlab").unwrap_err();
        assert_eq!(err.to_string(), "Provider with key gitlab not found.");
    }

    #[test]
    fn presets_stamp_out_full_configs() {
        let config = by_key("github").unwrap().config("id", "secret");
        assert_eq!(config.auth_endpoint, "https://github.com/login/oauth/authorize");
        assert_eq!(config.client_id, "id");
        assert!(config.active_user_endpoint.is_some());
    }
}
