use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::OAuthError;
use crate::types::{ProviderResponse, QueryArgs, TokenRequest};

/// Immutable single-provider configuration.
///
/// The endpoint URLs may carry query parameters of their own; those are
/// merged into generated URLs with caller-supplied arguments taking
/// precedence on key collisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub auth_endpoint: String,
    pub token_endpoint: String,
    /// Absent (or empty) disables active-user lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user_endpoint: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

impl ProviderConfig {
    pub fn new(
        auth_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            auth_endpoint: auth_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            active_user_endpoint: None,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn with_active_user_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.active_user_endpoint = Some(endpoint.into());
        self
    }

    /// Builds a configuration from a built-in provider preset.
    pub fn from_provider_key(
        key: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, OAuthError> {
        let preset = crate::providers::by_key(key)?;
        Ok(preset.config(client_id, client_secret))
    }
}

/// Stateless OAuth2 client bound to one provider configuration.
///
/// Endpoint URLs are parsed once at construction, so the URL-building
/// operations are infallible afterwards. The client holds no mutable state
/// and is safe to share across tasks.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    config: ProviderConfig,
    auth_endpoint: Url,
    token_endpoint: Url,
    active_user_endpoint: Option<Url>,
    http: reqwest::Client,
}

impl OAuth2Client {
    pub fn new(config: ProviderConfig) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http_client(config, http)
    }

    /// Uses a caller-built `reqwest::Client`, e.g. one with timeouts or a
    /// proxy configured.
    pub fn with_http_client(
        config: ProviderConfig,
        http: reqwest::Client,
    ) -> Result<Self, OAuthError> {
        if config.client_id.is_empty() {
            return Err(OAuthError::EmptyConfigField { field: "client_id" });
        }
        if config.client_secret.is_empty() {
            return Err(OAuthError::EmptyConfigField {
                field: "client_secret",
            });
        }

        let auth_endpoint = Url::parse(&config.auth_endpoint)?;
        let token_endpoint = Url::parse(&config.token_endpoint)?;
        let active_user_endpoint = match config.active_user_endpoint.as_deref() {
            Some(endpoint) if !endpoint.is_empty() => Some(Url::parse(endpoint)?),
            _ => None,
        };

        Ok(Self {
            config,
            auth_endpoint,
            token_endpoint,
            active_user_endpoint,
            http,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds the URL the end user's browser is redirected to for the
    /// authorization step.
    ///
    /// The configured endpoint's own query parameters are merged with
    /// `args` (args win), then `redirect_uri` is set when supplied,
    /// `response_type` defaults to `"code"` when absent, and `client_id`
    /// from the configuration overrides everything else.
    pub fn auth_url(&self, redirect_uri: Option<&str>, args: &[(&str, &str)]) -> String {
        let mut merged = merge_query(&self.auth_endpoint, args);
        if let Some(redirect_uri) = redirect_uri {
            merged.insert("redirect_uri".to_string(), redirect_uri.to_string());
        }
        merged
            .entry("response_type".to_string())
            .or_insert_with(|| "code".to_string());
        merged.insert("client_id".to_string(), self.config.client_id.clone());

        replace_query(&self.auth_endpoint, &merged).to_string()
    }

    /// Builds the token-exchange request.
    ///
    /// The merged arguments travel only in the request body; the returned
    /// URL has its query string stripped entirely.
    fn token_request(
        &self,
        code: Option<&str>,
        redirect_uri: Option<&str>,
        args: &[(&str, &str)],
    ) -> TokenRequest {
        let mut body = merge_query(&self.token_endpoint, args);
        if let Some(code) = code {
            body.insert("code".to_string(), code.to_string());
        }
        if let Some(redirect_uri) = redirect_uri {
            body.insert("redirect_uri".to_string(), redirect_uri.to_string());
        }
        body.entry("grant_type".to_string())
            .or_insert_with(|| "authorization_code".to_string());
        body.insert("client_id".to_string(), self.config.client_id.clone());
        body.insert(
            "client_secret".to_string(),
            self.config.client_secret.clone(),
        );

        let mut url = self.token_endpoint.clone();
        url.set_query(None);

        TokenRequest { url, body }
    }

    /// Builds the URL for the authenticated-user profile fetch.
    ///
    /// Returns `None` when no active-user endpoint is configured; callers
    /// must check for this before use.
    pub fn active_user_url(
        &self,
        access_token: Option<&str>,
        args: &[(&str, &str)],
    ) -> Option<String> {
        let endpoint = self.active_user_endpoint.as_ref()?;
        let mut merged = merge_query(endpoint, args);
        if let Some(access_token) = access_token {
            merged.insert("access_token".to_string(), access_token.to_string());
        }
        Some(replace_query(endpoint, &merged).to_string())
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// The HTTP status is not gated: a non-2xx response with a parseable
    /// body is returned as a normal [`ProviderResponse`], since providers
    /// deliver OAuth error objects that way. Only an empty body fails.
    pub async fn exchange_grant_token(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<ProviderResponse, OAuthError> {
        let TokenRequest { url, body } = self.token_request(Some(code), redirect_uri, &[]);
        tracing::debug!(url = %url, "Exchanging authorization code for tokens");

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        normalize_response(status, &body)
    }

    /// Fetches the authenticated user's profile.
    pub async fn fetch_active_user(
        &self,
        access_token: &str,
    ) -> Result<ProviderResponse, OAuthError> {
        let url = self
            .active_user_url(Some(access_token), &[])
            .ok_or(OAuthError::ActiveUserUnsupported)?;
        tracing::debug!("Fetching active user profile");

        let response = self.http.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        normalize_response(status, &body)
    }
}

fn merge_query(endpoint: &Url, args: &[(&str, &str)]) -> QueryArgs {
    let mut merged: QueryArgs = endpoint.query_pairs().into_owned().collect();
    for (key, value) in args {
        merged.insert((*key).to_string(), (*value).to_string());
    }
    merged
}

fn replace_query(endpoint: &Url, args: &QueryArgs) -> Url {
    let mut url = endpoint.clone();
    if args.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(args).finish();
    }
    url
}

fn normalize_response(status: StatusCode, body: &str) -> Result<ProviderResponse, OAuthError> {
    if body.is_empty() {
        return Err(OAuthError::EmptyResponse {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        tracing::warn!(
            status = status.as_u16(),
            "Provider answered with a non-success status"
        );
    }
    ProviderResponse::parse(body)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use url::Url;

    use super::{OAuth2Client, ProviderConfig};
    use crate::OAuthError;

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            "https://provider.test/oauth/authorize?audience=api&scope=basic",
            "https://provider.test/oauth/token?audience=api",
            "client-id",
            "client-secret",
        )
    }

    fn client() -> OAuth2Client {
        OAuth2Client::new(config()).unwrap()
    }

    fn query_map(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn construction_rejects_empty_client_id() {
        let mut config = config();
        config.client_id = String::new();
        let result = OAuth2Client::new(config);
        assert!(matches!(
            result,
            Err(OAuthError::EmptyConfigField { field: "client_id" })
        ));
    }

    #[test]
    fn construction_rejects_malformed_endpoints() {
        let mut config = config();
        config.token_endpoint = "not a url".to_string();
        assert!(matches!(OAuth2Client::new(config), Err(OAuthError::Url(_))));
    }

    #[test]
    fn auth_url_merges_endpoint_params_with_args() {
        let url = client().auth_url(None, &[("scope", "full"), ("prompt", "consent")]);
        let pairs = query_map(&url);

        assert_eq!(pairs.get("audience"), Some(&"api".to_string()));
        assert_eq!(pairs.get("scope"), Some(&"full".to_string()));
        assert_eq!(pairs.get("prompt"), Some(&"consent".to_string()));
        assert_eq!(pairs.get("response_type"), Some(&"code".to_string()));
        assert_eq!(pairs.get("client_id"), Some(&"client-id".to_string()));
    }

    #[test]
    fn auth_url_sets_redirect_uri_when_supplied() {
        let url = client().auth_url(Some("https://app.test/callback"), &[]);
        let pairs = query_map(&url);
        assert_eq!(
            pairs.get("redirect_uri"),
            Some(&"https://app.test/callback".to_string())
        );
    }

    #[test]
    fn auth_url_preserves_caller_response_type() {
        let url = client().auth_url(None, &[("response_type", "token")]);
        let pairs = query_map(&url);
        assert_eq!(pairs.get("response_type"), Some(&"token".to_string()));
    }

    #[test]
    fn auth_url_client_id_wins_over_caller_args() {
        let url = client().auth_url(None, &[("client_id", "spoofed")]);
        let pairs = query_map(&url);
        assert_eq!(pairs.get("client_id"), Some(&"client-id".to_string()));
    }

    #[test]
    fn auth_url_key_order_is_stable() {
        let config = ProviderConfig::new(
            "https://provider.test/oauth/authorize",
            "https://provider.test/oauth/token",
            "client-id",
            "client-secret",
        );
        let client = OAuth2Client::new(config).unwrap();
        let url = client.auth_url(None, &[("zeta", "1"), ("alpha", "2")]);
        assert_eq!(
            url,
            "https://provider.test/oauth/authorize?alpha=2&client_id=client-id&response_type=code&zeta=1"
        );
    }

    #[test]
    fn auth_url_merge_is_idempotent() {
        let client = client();
        let args = [("scope", "full"), ("prompt", "consent")];
        assert_eq!(client.auth_url(None, &args), client.auth_url(None, &args));
    }

    #[test]
    fn token_request_url_never_carries_a_query_string() {
        let request = client().token_request(Some("grant"), None, &[]);
        assert_eq!(request.url.query(), None);
        assert_eq!(request.url.as_str(), "https://provider.test/oauth/token");
        // The endpoint's own parameters move into the body instead.
        assert_eq!(request.body.get("audience"), Some(&"api".to_string()));
    }

    #[test]
    fn token_request_fills_protocol_fields() {
        let request =
            client().token_request(Some("grant"), Some("https://app.test/callback"), &[]);
        assert_eq!(request.body.get("code"), Some(&"grant".to_string()));
        assert_eq!(
            request.body.get("redirect_uri"),
            Some(&"https://app.test/callback".to_string())
        );
        assert_eq!(
            request.body.get("grant_type"),
            Some(&"authorization_code".to_string())
        );
        assert_eq!(request.body.get("client_id"), Some(&"client-id".to_string()));
        assert_eq!(
            request.body.get("client_secret"),
            Some(&"client-secret".to_string())
        );
    }

    #[test]
    fn token_request_preserves_caller_grant_type() {
        let request = client().token_request(None, None, &[("grant_type", "client_credentials")]);
        assert_eq!(
            request.body.get("grant_type"),
            Some(&"client_credentials".to_string())
        );
        assert_eq!(request.body.get("code"), None);
    }

    #[test]
    fn active_user_url_is_none_without_endpoint() {
        assert_eq!(client().active_user_url(Some("token"), &[]), None);

        let empty = config().with_active_user_endpoint("");
        let client = OAuth2Client::new(empty).unwrap();
        assert_eq!(client.active_user_url(Some("token"), &[]), None);
    }

    #[test]
    fn active_user_url_sets_access_token() {
        let config = config().with_active_user_endpoint("https://provider.test/user?format=json");
        let client = OAuth2Client::new(config).unwrap();

        let url = client.active_user_url(Some("tok-123"), &[]).unwrap();
        let pairs = query_map(&url);
        assert_eq!(pairs.get("access_token"), Some(&"tok-123".to_string()));
        assert_eq!(pairs.get("format"), Some(&"json".to_string()));
    }

    #[test]
    fn active_user_url_without_token_keeps_endpoint_params_only() {
        let config = config().with_active_user_endpoint("https://provider.test/user");
        let client = OAuth2Client::new(config).unwrap();
        assert_eq!(
            client.active_user_url(None, &[]).unwrap(),
            "https://provider.test/user"
        );
    }
}
