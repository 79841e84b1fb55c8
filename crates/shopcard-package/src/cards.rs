//! Renders a product's cards for several templates into one download.

use std::collections::HashSet;

use shopcard_core::{CardConfig, Product, Template};
use shopcard_layout::{render_svg, CardLayoutEngine};

use crate::archive::{archive_file_name, asset_name, prepare_download, Asset, Download};
use crate::metadata::metadata_text;
use crate::PackageError;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A validated template list: duplicates dropped in first-seen order,
/// truncated to the card cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBatch {
    templates: Vec<Template>,
}

/// A finished download, ready to write to disk or send over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDownload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl CardBatch {
    /// A cap of zero still allows one card.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::NoTemplates`] if `templates` is empty.
    pub fn new(templates: Vec<Template>, max_cards: usize) -> Result<Self, PackageError> {
        let mut seen = HashSet::new();
        let mut templates: Vec<Template> =
            templates.into_iter().filter(|t| seen.insert(*t)).collect();
        if templates.is_empty() {
            return Err(PackageError::NoTemplates);
        }
        let cap = max_cards.max(1);
        if templates.len() > cap {
            tracing::warn!(
                requested = templates.len(),
                max_cards = cap,
                "template list capped"
            );
            templates.truncate(cap);
        }
        Ok(Self { templates })
    }

    #[cfg(test)]
    fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Lays out and paints one SVG per template with the shared `config`,
    /// then packages them: a lone card is returned as-is, several become a
    /// zip with `product-info.txt`.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError`] if the archive cannot be written.
    pub async fn render(
        &self,
        engine: &CardLayoutEngine,
        product: &Product,
        description: &str,
        config: &CardConfig,
    ) -> Result<CardDownload, PackageError> {
        let assets: Vec<Asset> = self
            .templates
            .iter()
            .map(|&template| {
                let plan = engine.layout(product, description, &config.with_template(template));
                Asset::new(
                    asset_name(&product.item_id, template.keyword(), "svg"),
                    render_svg(&plan).into_bytes(),
                )
            })
            .collect();

        let metadata = metadata_text(product, description, &config.currency_symbol);
        let download = match prepare_download(assets, &metadata).await? {
            Download::Single(asset) => CardDownload {
                file_name: asset.name,
                content_type: SVG_CONTENT_TYPE,
                bytes: asset.bytes,
            },
            Download::Archive(bytes) => CardDownload {
                file_name: archive_file_name(&product.item_id),
                content_type: ZIP_CONTENT_TYPE,
                bytes,
            },
        };

        tracing::info!(
            item_id = %product.item_id,
            cards = self.templates.len(),
            file_name = %download.file_name,
            "card download prepared"
        );
        Ok(download)
    }
}
