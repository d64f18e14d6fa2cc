use super::ProviderEndpoints;

// GitHub's token endpoint answers form-encoded unless asked for JSON via the
// Accept header; both shapes normalize the same way.
const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const ACTIVE_USER_URL: &str = "https://api.github.com/user";

pub(super) const ENDPOINTS: ProviderEndpoints = ProviderEndpoints {
    key: "github",
    auth_endpoint: AUTHORIZE_URL,
    token_endpoint: TOKEN_URL,
    active_user_endpoint: Some(ACTIVE_USER_URL),
};
