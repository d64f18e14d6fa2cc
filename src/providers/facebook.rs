use super::ProviderEndpoints;

const AUTHORIZE_URL: &str = "https://www.facebook.com/dialog/oauth";
const TOKEN_URL: &str = "https://graph.facebook.com/oauth/access_token";
const ACTIVE_USER_URL: &str = "https://graph.facebook.com/me";

pub(super) const ENDPOINTS: ProviderEndpoints = ProviderEndpoints {
    key: "facebook",
    auth_endpoint: AUTHORIZE_URL,
    token_endpoint: TOKEN_URL,
    active_user_endpoint: Some(ACTIVE_USER_URL),
};
