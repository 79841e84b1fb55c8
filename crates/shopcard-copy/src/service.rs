//! Description resolution: cached text, then AI, then the local fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shopcard_core::{AppConfig, Product, StorageBackend};
use tokio::sync::Semaphore;

use crate::error::CopyError;
use crate::fallback::FallbackGenerator;
use crate::gemini::GeminiClient;

const CACHE_PREFIX: &str = "description:";

/// Where a description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSource {
    Cache,
    Ai,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
    pub source: DescriptionSource,
}

/// Storage key for a product's AI description.
///
/// Hashes every field the copy mentions, so a price or rating change produces
/// a new key instead of serving stale text.
#[must_use]
pub fn cache_key(product: &Product, currency_symbol: &str) -> String {
    let mut hasher = Sha256::new();
    let fields = [
        product.item_id.clone(),
        product.product_name.clone(),
        product.price.normalize().to_string(),
        product
            .discount_rate()
            .map(|r| r.normalize().to_string())
            .unwrap_or_default(),
        product
            .rating_star
            .map(|r| r.normalize().to_string())
            .unwrap_or_default(),
        product.sales.to_string(),
        product.ships_free().to_string(),
        currency_symbol.to_string(),
    ];
    for field in &fields {
        hasher.update(field.as_bytes());
        hasher.update([0x1f]);
    }
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{CACHE_PREFIX}{hex}")
}

/// Resolves the copy for a card. Never fails: every AI-side problem is
/// logged and answered with [`FallbackGenerator`] output.
///
/// The currency symbol is chosen per call, so one service serves requests
/// that override the profile's currency.
pub struct DescriptionService {
    client: Option<GeminiClient>,
    store: Arc<dyn StorageBackend>,
    permits: Semaphore,
}

impl DescriptionService {
    /// `client` of `None` disables the AI path entirely. `max_concurrent`
    /// bounds in-flight AI calls and is clamped to at least one.
    #[must_use]
    pub fn new(
        client: Option<GeminiClient>,
        store: Arc<dyn StorageBackend>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            client,
            store,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Service for a running deployment: AI is enabled only when
    /// `GEMINI_API_KEY` is configured.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError`] if the Gemini client cannot be built.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn StorageBackend>,
    ) -> Result<Self, CopyError> {
        let client = config
            .gemini_api_key
            .as_deref()
            .map(|key| {
                GeminiClient::with_base_url(
                    key,
                    &config.gemini_model,
                    config.ai_timeout_secs,
                    &config.gemini_base_url,
                )
            })
            .transpose()?;
        match &client {
            Some(client) => tracing::info!(model = client.model(), "AI descriptions enabled"),
            None => tracing::warn!("GEMINI_API_KEY not set; descriptions use fallback copy only"),
        }
        Ok(Self::new(client, store, config.ai_max_concurrent))
    }

    /// Service without an AI client.
    #[must_use]
    pub fn offline(store: Arc<dyn StorageBackend>) -> Self {
        Self::new(None, store, 1)
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub async fn describe(&self, product: &Product, currency_symbol: &str) -> Description {
        let Some(client) = &self.client else {
            return Self::describe_fallback(product, currency_symbol);
        };

        let key = cache_key(product, currency_symbol);
        match self.cached(&key) {
            Ok(Some(text)) => {
                tracing::debug!(item_id = %product.item_id, "description cache hit");
                return Description {
                    text,
                    source: DescriptionSource::Cache,
                };
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(item_id = %product.item_id, error = %error, "description cache read failed");
            }
        }

        match self.ask_ai(client, product, currency_symbol, &key).await {
            Ok(text) => Description {
                text,
                source: DescriptionSource::Ai,
            },
            Err(error) => {
                tracing::warn!(
                    item_id = %product.item_id,
                    model = client.model(),
                    error = %error,
                    "AI description failed; using fallback copy"
                );
                Self::describe_fallback(product, currency_symbol)
            }
        }
    }

    #[must_use]
    pub fn describe_fallback(product: &Product, currency_symbol: &str) -> Description {
        Description {
            text: FallbackGenerator::new(currency_symbol).generate(product),
            source: DescriptionSource::Fallback,
        }
    }

    fn cached(&self, key: &str) -> Result<Option<String>, CopyError> {
        let Some(bytes) = self.store.get(key)? else {
            return Ok(None);
        };
        Ok(String::from_utf8(bytes)
            .ok()
            .filter(|text| !text.trim().is_empty()))
    }

    async fn ask_ai(
        &self,
        client: &GeminiClient,
        product: &Product,
        currency_symbol: &str,
        key: &str,
    ) -> Result<String, CopyError> {
        let _permit = self.permits.acquire().await.map_err(|_| CopyError::LimiterClosed)?;
        let text = client.describe(product, currency_symbol).await?;

        if let Err(error) = self.store.set(key, text.as_bytes()) {
            tracing::warn!(item_id = %product.item_id, error = %error, "description cache write failed");
        }
        tracing::info!(item_id = %product.item_id, chars = text.chars().count(), "AI description generated");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use shopcard_core::MemoryStore;

    use super::*;

    fn product() -> Product {
        Product {
            item_id: "9".to_string(),
            product_name: "Batom Matte".to_string(),
            price: Decimal::from_str("19.90").unwrap(),
            price_discount_rate: None,
            sales: 10,
            rating_star: None,
            shop_name: None,
            image_url: String::new(),
            offer_link: None,
            free_shipping: None,
        }
    }

    #[test]
    fn cache_key_is_stable_and_prefixed() {
        let a = cache_key(&product(), "R$");
        let b = cache_key(&product(), "R$");
        assert_eq!(a, b);
        assert!(a.starts_with("description:"));
        assert_eq!(a.len(), "description:".len() + 64);
    }

    #[test]
    fn cache_key_changes_with_price_and_currency() {
        let base = cache_key(&product(), "R$");
        let mut cheaper = product();
        cheaper.price = Decimal::from_str("9.90").unwrap();
        assert_ne!(base, cache_key(&cheaper, "R$"));
        assert_ne!(base, cache_key(&product(), "US$"));
    }

    #[test]
    fn cache_key_ignores_trailing_zero_scale() {
        let mut scaled = product();
        scaled.price = Decimal::from_str("19.9000").unwrap();
        assert_eq!(cache_key(&product(), "R$"), cache_key(&scaled, "R$"));
    }

    #[tokio::test]
    async fn without_client_uses_fallback() {
        let service = DescriptionService::offline(Arc::new(MemoryStore::new()));
        assert!(!service.ai_enabled());
        let description = service.describe(&product(), "R$").await;
        assert_eq!(description.source, DescriptionSource::Fallback);
        assert!(description.text.contains("Batom Matte"));
    }

    #[tokio::test]
    async fn fallback_follows_requested_currency() {
        let service = DescriptionService::offline(Arc::new(MemoryStore::new()));
        let dollars = service.describe(&product(), "US$").await;
        assert!(dollars.text.contains("US$ 19.90"), "{}", dollars.text);
        assert!(!dollars.text.contains("R$"));

        let reais = service.describe(&product(), "R$").await;
        assert!(reais.text.contains("R$ 19.90"));
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DescriptionSource::Fallback).unwrap(),
            "\"fallback\""
        );
    }

    fn app_config(api_key: Option<&str>) -> AppConfig {
        AppConfig {
            env: shopcard_core::Environment::Test,
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            profile_path: None,
            storage_dir: None,
            gemini_api_key: api_key.map(str::to_string),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            ai_timeout_secs: 1,
            ai_max_concurrent: 2,
            max_cards: 8,
        }
    }

    #[test]
    fn from_config_enables_ai_only_with_key() {
        let store: Arc<dyn StorageBackend> = Arc::new(MemoryStore::new());
        let offline =
            DescriptionService::from_config(&app_config(None), Arc::clone(&store)).unwrap();
        assert!(!offline.ai_enabled());

        let online = DescriptionService::from_config(&app_config(Some("k")), store).unwrap();
        assert!(online.ai_enabled());
    }

    #[test]
    fn from_config_rejects_bad_base_url() {
        let mut config = app_config(Some("k"));
        config.gemini_base_url = "not a url".to_string();
        let result = DescriptionService::from_config(&config, Arc::new(MemoryStore::new()));
        assert!(matches!(result, Err(CopyError::InvalidBaseUrl { .. })));
    }
}
