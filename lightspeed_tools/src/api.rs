use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::LightspeedConfig,
    item::{Item, ItemBatch, ItemFilter, NewItem},
    token::{TokenManager, TokenPair},
    LightspeedApiError,
};

#[derive(Clone)]
pub struct LightspeedApi {
    config: LightspeedConfig,
    client: Arc<Client>,
    tokens: TokenManager,
}

#[derive(Deserialize)]
struct ItemResponse {
    #[serde(rename = "Item")]
    item: Item,
}

impl LightspeedApi {
    pub fn new(config: LightspeedConfig) -> Result<Self, LightspeedApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| LightspeedApiError::Initialization(e.to_string()))?;
        let client = Arc::new(client);
        let tokens = TokenManager::new(&config, Arc::clone(&client));
        Ok(Self { config, client, tokens })
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn refresh_access_token(&self) -> Result<TokenPair, LightspeedApiError> {
        self.tokens.refresh().await
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, LightspeedApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let token = self.tokens.access_token().await;
        let mut req = self.client.request(method, url).bearer_auth(token.reveal());
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| LightspeedApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| LightspeedApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| LightspeedApiError::RestResponseError(e.to_string()))?;
            Err(LightspeedApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/API/Account/{}{path}", self.config.api_url.trim_end_matches('/'), self.config.account_id)
    }

    pub async fn fetch_items(&self, filter: &ItemFilter) -> Result<ItemBatch, LightspeedApiError> {
        debug!("🏬️ Fetching items matching {filter:?}");
        let params = filter.params();
        let batch = self.rest_query::<ItemBatch, ()>(Method::GET, "/Item.json", &params, None).await?;
        info!("🏬️ Fetched items. Count: {}", batch.count());
        Ok(batch)
    }

    pub async fn create_item(&self, item: &NewItem) -> Result<Item, LightspeedApiError> {
        debug!("🏬️ Creating item: {}", serde_json::to_string(item).unwrap_or_default());
        let result = self.rest_query::<ItemResponse, &NewItem>(Method::POST, "/Item.json", &[], Some(item)).await?;
        info!(
            "🏬️ Item {} created. id: {}",
            item.description,
            result.item.item_id.as_deref().unwrap_or("unknown")
        );
        Ok(result.item)
    }
}

#[cfg(test)]
mod test {
    use sync_common::Secret;

    use super::*;

    fn config(api_url: &str) -> LightspeedConfig {
        LightspeedConfig {
            account_id: "98765".into(),
            client_id: "client".into(),
            client_secret: Secret::from("secret"),
            access_token: Secret::from("access"),
            refresh_token: Secret::from("refresh"),
            redirect_uri: "https://example.com/token".into(),
            api_url: api_url.into(),
            oauth_url: "http://127.0.0.1:1".into(),
        }
    }

    #[test]
    fn builds_account_urls() {
        let api = LightspeedApi::new(config("https://api.lightspeedapp.com/")).unwrap();
        assert_eq!(api.url("/Item.json"), "https://api.lightspeedapp.com/API/Account/98765/Item.json");
    }

    #[test]
    fn created_item_response() {
        let json = r#"{"Item":{"itemID":"77","description":"Sofa","customSku":"S-1"}}"#;
        let response: ItemResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.item.item_id.as_deref(), Some("77"));
        assert_eq!(response.item.custom_sku.as_deref(), Some("S-1"));
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_a_transport_error() {
        let api = LightspeedApi::new(config("http://127.0.0.1:1")).unwrap();
        let err = api.refresh_access_token().await.unwrap_err();
        assert!(matches!(err, LightspeedApiError::RestResponseError(_)));
        // A failed refresh leaves the existing tokens untouched
        assert_eq!(api.token_manager().tokens().await, TokenPair::new("access", "refresh"));
    }
}
