use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::Url;

use crate::OAuthError;

/// Query or body arguments keyed by parameter name.
///
/// A `BTreeMap` keeps serialized query strings in a stable key order, so the
/// same inputs always produce the same URL.
pub(crate) type QueryArgs = BTreeMap<String, String>;

/// A prepared token-exchange request: the endpoint with its query string
/// stripped, paired with the merged arguments that travel in the body.
#[derive(Debug, Clone)]
pub(crate) struct TokenRequest {
    pub url: Url,
    pub body: QueryArgs,
}

/// A normalized provider response body.
///
/// Token endpoints usually answer JSON, but some (GitHub and older Facebook
/// Graph API versions among them) answer form-encoded strings instead. Both
/// encodings are exposed behind the same accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Json(Map<String, Value>),
    Form(BTreeMap<String, String>),
}

impl ProviderResponse {
    /// Normalizes a response body.
    ///
    /// Tries JSON first. A body that is not syntactically JSON is reparsed as
    /// a form-encoded string instead; form parsing is lenient and cannot
    /// fail. JSON that parses but is not an object (an array, say) is an
    /// error, not a fallback candidate.
    pub(crate) fn parse(body: &str) -> Result<Self, OAuthError> {
        match serde_json::from_str::<Map<String, Value>>(body) {
            Ok(fields) => Ok(Self::Json(fields)),
            Err(err) if is_syntax_error(&err) => {
                let fields = url::form_urlencoded::parse(body.as_bytes())
                    .into_owned()
                    .collect();
                Ok(Self::Form(fields))
            }
            Err(err) => Err(OAuthError::Json(err)),
        }
    }

    /// Looks up a string field regardless of the response encoding.
    ///
    /// JSON fields holding non-string values return `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            Self::Json(fields) => fields.get(key).and_then(Value::as_str),
            Self::Form(fields) => fields.get(key).map(String::as_str),
        }
    }

    /// The `access_token` field, when present.
    pub fn access_token(&self) -> Option<&str> {
        self.get_str("access_token")
    }
}

fn is_syntax_error(err: &serde_json::Error) -> bool {
    matches!(
        err.classify(),
        serde_json::error::Category::Syntax | serde_json::error::Category::Eof
    )
}
