use dex_domain::entities::AssetId;
use thiserror::Error;

/// Errors raised while building the in-memory stores.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Asset id '{0}' is already registered")]
    DuplicateAsset(AssetId),

    #[error("Asset '{0}' has a negative balance")]
    NegativeBalance(AssetId),

    #[error("Asset '{0}' has a negative price")]
    NegativePrice(AssetId),

    #[error("Pool id '{0}' is already registered")]
    DuplicatePool(String),

    #[error("Position references unknown pool '{0}'")]
    UnknownPool(String),

    #[error("Pool '{0}' already has a position")]
    DuplicatePosition(String),
}

/// Errors raised while loading seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid seed data: {0}")]
    Registry(#[from] RegistryError),
}
