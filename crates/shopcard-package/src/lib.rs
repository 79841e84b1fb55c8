//! Bundles rendered card assets and a product summary for download.

pub mod archive;
pub mod cards;
pub mod metadata;

use thiserror::Error;

pub use archive::{
    archive_file_name, asset_name, list_entries, pack, prepare_download, read_entry, Asset,
    Download, METADATA_ENTRY_NAME,
};
pub use cards::{CardBatch, CardDownload, SVG_CONTENT_TYPE, ZIP_CONTENT_TYPE};
pub use metadata::metadata_text;

#[derive(Debug, Error)]
pub enum PackageError {
    /// Nothing to package; callers with exactly one asset should serve it
    /// directly instead.
    #[error("cannot package zero assets")]
    Empty,

    #[error("at least one template is required")]
    NoTemplates,

    #[error("duplicate entry name '{0}'")]
    DuplicateName(String),

    #[error("invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("entry '{0}' not found in archive")]
    MissingEntry(String),

    #[error("zip error: {0}")]
    Zip(#[from] async_zip::error::ZipError),
}
