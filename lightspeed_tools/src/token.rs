use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde::Deserialize;
use sync_common::Secret;
use tokio::sync::RwLock;
use url::Url;

use crate::{
    config::{LightspeedConfig, DEFAULT_OAUTH_SCOPE},
    LightspeedApiError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPair {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
}

impl TokenPair {
    pub fn new<S: Into<String>>(access_token: S, refresh_token: S) -> Self {
        Self { access_token: Secret::new(access_token.into()), refresh_token: Secret::new(refresh_token.into()) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Owns the OAuth token pair for the inventory API.
///
/// The pair lives in memory only. It is seeded from configuration and replaced whenever an exchange succeeds. Clones
/// share the same state, and this type is the only writer: the API client merely reads the current access token.
#[derive(Clone)]
pub struct TokenManager {
    client: Arc<Client>,
    client_id: String,
    client_secret: Secret<String>,
    redirect_uri: String,
    oauth_url: String,
    tokens: Arc<RwLock<TokenPair>>,
}

impl TokenManager {
    pub fn new(config: &LightspeedConfig, client: Arc<Client>) -> Self {
        let tokens = TokenPair {
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
        };
        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            oauth_url: config.oauth_url.trim_end_matches('/').to_string(),
            tokens: Arc::new(RwLock::new(tokens)),
        }
    }

    pub async fn tokens(&self) -> TokenPair {
        self.tokens.read().await.clone()
    }

    pub async fn access_token(&self) -> Secret<String> {
        self.tokens.read().await.access_token.clone()
    }

    /// The URL an operator must visit to grant access. Lightspeed redirects to the configured redirect URI with a
    /// `code` parameter, which is then passed to [`TokenManager::exchange_code`].
    pub fn authorization_url(&self) -> Result<String, LightspeedApiError> {
        let base = format!("{}/oauth/authorize.php", self.oauth_url);
        let url = Url::parse_with_params(&base, &[
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("scope", DEFAULT_OAUTH_SCOPE),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .map_err(|e| LightspeedApiError::Initialization(format!("Invalid OAuth URL {base}. {e}")))?;
        Ok(url.to_string())
    }

    /// One-time exchange of an authorization code. Both tokens are replaced.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, LightspeedApiError> {
        debug!("🔑️ Exchanging authorization code for an access token");
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.reveal().as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self.request_token(&form).await?;
        let pair = self.store_code_exchange(response).await;
        info!("🔑️ Authorization code exchanged. New access and refresh tokens are in place.");
        Ok(pair)
    }

    /// Swaps the current refresh token for a new access token. The refresh token itself is kept as is.
    pub async fn refresh(&self) -> Result<TokenPair, LightspeedApiError> {
        debug!("🔑️ Refreshing access token");
        let refresh_token = self.tokens.read().await.refresh_token.clone();
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.reveal().as_str()),
            ("refresh_token", refresh_token.reveal().as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self.request_token(&form).await?;
        let pair = self.store_refresh(response).await;
        info!("🔑️ Access token refreshed");
        Ok(pair)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, LightspeedApiError> {
        let url = format!("{}/oauth/access_token.php", self.oauth_url);
        trace!("Sending token request to {url}");
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| LightspeedApiError::RestResponseError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| LightspeedApiError::RestResponseError(e.to_string()))?;
        parse_token_response(status, &body)
    }

    pub(crate) async fn store_refresh(&self, response: TokenResponse) -> TokenPair {
        let mut tokens = self.tokens.write().await;
        tokens.access_token = Secret::new(response.access_token);
        if let Some(expires_in) = response.expires_in {
            debug!("🔑️ New access token expires in {expires_in}s");
        }
        tokens.clone()
    }

    pub(crate) async fn store_code_exchange(&self, response: TokenResponse) -> TokenPair {
        let mut tokens = self.tokens.write().await;
        tokens.access_token = Secret::new(response.access_token);
        match response.refresh_token {
            Some(refresh_token) => tokens.refresh_token = Secret::new(refresh_token),
            None => warn!("🔑️ The code exchange did not return a refresh token. Keeping the previous one."),
        }
        tokens.clone()
    }
}

/// Anything other than a 200 from the token endpoint is an auth failure, even other 2xx codes.
pub(crate) fn parse_token_response(status: u16, body: &str) -> Result<TokenResponse, LightspeedApiError> {
    if status != 200 {
        return Err(LightspeedApiError::AuthError { status, message: body.to_string() });
    }
    serde_json::from_str::<TokenResponse>(body).map_err(|e| LightspeedApiError::JsonError(e.to_string()))
}
