use log::*;
use sync_common::{env_or_default, Secret};

pub const DEFAULT_LIGHTSPEED_API_URL: &str = "https://api.lightspeedapp.com";
pub const DEFAULT_LIGHTSPEED_OAUTH_URL: &str = "https://cloud.lightspeedapp.com";
pub const DEFAULT_REDIRECT_URI: &str = "https://localhost/token";
pub const DEFAULT_OAUTH_SCOPE: &str = "employee:all";

#[derive(Debug, Clone, Default)]
pub struct LightspeedConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// The access token to start with. It is replaced on every refresh.
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    /// Must match the redirect URI registered with the OAuth client.
    pub redirect_uri: String,
    pub api_url: String,
    pub oauth_url: String,
}

impl LightspeedConfig {
    pub fn new_from_env_or_default() -> Self {
        let account_id = std::env::var("LIGHTSPEED_ACCOUNT_ID").unwrap_or_else(|_| {
            error!("🏬️ LIGHTSPEED_ACCOUNT_ID is not set. Please set it to your Lightspeed account id.");
            String::default()
        });
        let client_id = std::env::var("LIGHTSPEED_CLIENT_ID").unwrap_or_else(|_| {
            error!("🏬️ LIGHTSPEED_CLIENT_ID is not set. Please set it to the client id of your Lightspeed API client.");
            String::default()
        });
        let client_secret = Secret::new(std::env::var("LIGHTSPEED_CLIENT_SECRET").unwrap_or_else(|_| {
            error!("🏬️ LIGHTSPEED_CLIENT_SECRET is not set. Token refreshes will fail.");
            String::default()
        }));
        let access_token = Secret::new(std::env::var("LIGHTSPEED_ACCESS_TOKEN").unwrap_or_default());
        let refresh_token = Secret::new(std::env::var("LIGHTSPEED_REFRESH_TOKEN").unwrap_or_else(|_| {
            warn!("🏬️ LIGHTSPEED_REFRESH_TOKEN is not set. You will need to exchange an authorization code first.");
            String::default()
        }));
        let redirect_uri = env_or_default("LIGHTSPEED_REDIRECT_URI", DEFAULT_REDIRECT_URI);
        let api_url = std::env::var("LIGHTSPEED_API_URL").unwrap_or_else(|_| DEFAULT_LIGHTSPEED_API_URL.to_string());
        let oauth_url =
            std::env::var("LIGHTSPEED_OAUTH_URL").unwrap_or_else(|_| DEFAULT_LIGHTSPEED_OAUTH_URL.to_string());
        Self { account_id, client_id, client_secret, access_token, refresh_token, redirect_uri, api_url, oauth_url }
    }
}
