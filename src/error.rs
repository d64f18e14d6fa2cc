use thiserror::Error;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("configuration field `{field}` must not be empty")]
    EmptyConfigField { field: &'static str },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OAuth2 provider returned empty response with HTTP status {status}")]
    EmptyResponse { status: u16 },

    #[error("OAuth2 provider does not support active user lookup")]
    ActiveUserUnsupported,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider with key {key} not found.")]
    ProviderNotFound { key: String },
}
