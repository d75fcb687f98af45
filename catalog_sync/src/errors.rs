use lightspeed_tools::LightspeedApiError;
use shopify_tools::ShopifyApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Shopify request failed. {0}")]
    Storefront(#[from] ShopifyApiError),
    #[error("Lightspeed request failed. {0}")]
    Inventory(#[from] LightspeedApiError),
    #[error("Invalid configuration. {0}")]
    ConfigurationError(String),
}

impl SyncError {
    /// True when the inventory platform refused to issue a token. Only a new authorization code fixes this.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Inventory(LightspeedApiError::AuthError { .. }))
    }
}
