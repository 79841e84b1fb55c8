//! Domain types and pure derivations for promotional product cards.
//!
//! Everything here is synchronous and side-effect free apart from the
//! configuration loaders and the [`storage`] backends.

pub mod app_config;
pub mod card_config;
pub mod category;
pub mod config;
pub mod money;
pub mod pricing;
pub mod product;
pub mod profile;
pub mod storage;
pub mod theme;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use card_config::{CardConfig, CardConfigRequest, ImageFormat, Template};
pub use category::{classify, Category};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::{format_count, format_money, format_rating, DEFAULT_CURRENCY_SYMBOL};
pub use pricing::{compute_original_price, PricingError};
pub use product::{normalize_product, Product, RawProduct};
pub use profile::{load_profile, CardProfile};
pub use storage::{open_store, FsStore, MemoryStore, StorageBackend, StorageError};
pub use theme::{theme_colors, ColorOverrides, ThemeColors};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required product field: {0}")]
    MissingField(&'static str),

    #[error("invalid product field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("unknown image format '{0}'")]
    UnknownFormat(String),

    #[error("jpeg quality must be in (0, 1], got {0}")]
    InvalidQuality(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read card profile {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse card profile: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("card profile validation failed: {0}")]
    Validation(String),
}
