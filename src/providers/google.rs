use super::ProviderEndpoints;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
const ACTIVE_USER_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

pub(super) const ENDPOINTS: ProviderEndpoints = ProviderEndpoints {
    key: "google",
    auth_endpoint: AUTHORIZE_URL,
    token_endpoint: TOKEN_URL,
    active_user_endpoint: Some(ACTIVE_USER_URL),
};
