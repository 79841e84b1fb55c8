//! Card command handlers for the CLI.
//!
//! Each handler takes an already-normalized [`Product`]; reading and
//! validating the JSON file happens once in [`read_product`].

use std::path::Path;

use anyhow::Context as _;
use shopcard_copy::{Description, DescriptionService};
use shopcard_core::{
    normalize_product, open_store, AppConfig, CardConfig, CardConfigRequest, CardProfile,
    Product, RawProduct, Template,
};
use shopcard_layout::{render_svg, CardLayoutEngine, CardPlan};
use shopcard_package::{CardBatch, CardDownload};

/// Load and normalize a product from a JSON file in catalogue shape.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or fails
/// ingress validation.
pub(crate) fn read_product(path: &Path) -> anyhow::Result<Product> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read product file {}", path.display()))?;
    let raw: RawProduct = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse product file {}", path.display()))?;
    let product = normalize_product(raw)?;
    tracing::debug!(item_id = %product.item_id, "product loaded");
    Ok(product)
}

/// Everything a card command needs, built once from configuration.
pub(crate) struct CardContext {
    profile: CardProfile,
    descriptions: DescriptionService,
    engine: CardLayoutEngine,
    max_cards: usize,
}

impl CardContext {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let profile = match &config.profile_path {
            Some(path) => shopcard_core::load_profile(path)?,
            None => CardProfile::default(),
        };
        let store = open_store(config.storage_dir.as_deref())?;
        let descriptions = DescriptionService::from_config(config, store)?;
        Ok(Self::new(profile, descriptions, config.max_cards))
    }

    pub(crate) fn new(
        profile: CardProfile,
        descriptions: DescriptionService,
        max_cards: usize,
    ) -> Self {
        Self {
            profile,
            descriptions,
            engine: CardLayoutEngine::new(),
            max_cards,
        }
    }

    fn config(&self, template: Option<Template>) -> anyhow::Result<CardConfig> {
        let request = CardConfigRequest {
            template,
            ..CardConfigRequest::default()
        };
        Ok(CardConfig::from_request(
            request.or(&self.profile.as_request()),
        )?)
    }

    async fn describe_for(&self, product: &Product, config: &CardConfig) -> Description {
        self.descriptions
            .describe(product, &config.currency_symbol)
            .await
    }

    /// Copy in the profile's currency.
    pub(crate) async fn describe(&self, product: &Product) -> anyhow::Result<Description> {
        let config = self.config(None)?;
        Ok(self.describe_for(product, &config).await)
    }

    pub(crate) async fn plan(
        &self,
        product: &Product,
        template: Option<Template>,
    ) -> anyhow::Result<CardPlan> {
        let config = self.config(template)?;
        let description = self.describe_for(product, &config).await;
        Ok(self.engine.layout(product, &description.text, &config))
    }

    pub(crate) async fn render(
        &self,
        product: &Product,
        template: Option<Template>,
    ) -> anyhow::Result<String> {
        Ok(render_svg(&self.plan(product, template).await?))
    }

    /// Renders every requested template (the profile's list when empty) as
    /// one download.
    pub(crate) async fn pack(
        &self,
        product: &Product,
        templates: Vec<Template>,
    ) -> anyhow::Result<CardDownload> {
        let requested = if templates.is_empty() {
            self.profile.templates.clone()
        } else {
            templates
        };
        let batch = CardBatch::new(requested, self.max_cards)?;
        let config = self.config(None)?;
        let description = self.describe_for(product, &config).await;
        Ok(batch
            .render(&self.engine, product, &description.text, &config)
            .await?)
    }
}

/// Write `bytes` to `path`, naming the path in any error.
pub(crate) fn write_output(path: &Path, bytes: impl AsRef<[u8]>) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
