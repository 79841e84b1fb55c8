use std::collections::HashSet;

use async_zip::base::read::mem::ZipFileReader;
use async_zip::base::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};

use crate::PackageError;

/// Name of the text entry added to every archive.
pub const METADATA_ENTRY_NAME: &str = "product-info.txt";

/// One rendered file destined for the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// What a download request should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Exactly one asset; served as-is without an archive.
    Single(Asset),
    /// Zip bytes holding every asset plus [`METADATA_ENTRY_NAME`].
    Archive(Vec<u8>),
}

/// Builds an entry name like `card-123-modern.svg` from arbitrary parts,
/// replacing anything outside `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn asset_name(item_id: &str, label: &str, extension: &str) -> String {
    format!(
        "card-{}-{}.{}",
        sanitize(item_id),
        sanitize(label),
        sanitize(extension)
    )
}

/// File name for the archive of a product's cards.
#[must_use]
pub fn archive_file_name(item_id: &str) -> String {
    format!("product-{}-cards.zip", sanitize(item_id))
}

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

fn validate_names(assets: &[Asset]) -> Result<(), PackageError> {
    let mut seen = HashSet::from([METADATA_ENTRY_NAME]);
    for asset in assets {
        let name = asset.name.as_str();
        let reason = if name.trim().is_empty() {
            Some("name is empty")
        } else if name.starts_with('/') || name.contains('\\') {
            Some("absolute paths and backslashes are not allowed")
        } else if name.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
            Some("empty, '.' and '..' path segments are not allowed")
        } else if name.chars().any(char::is_control) {
            Some("control characters are not allowed")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(PackageError::InvalidName {
                name: name.to_string(),
                reason,
            });
        }
        if !seen.insert(name) {
            return Err(PackageError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

/// Zips `assets` in order, followed by `metadata` under [`METADATA_ENTRY_NAME`].
///
/// # Errors
///
/// - [`PackageError::Empty`] when `assets` is empty.
/// - [`PackageError::InvalidName`] / [`PackageError::DuplicateName`] for
///   unusable entry names, including a clash with the metadata entry.
/// - [`PackageError::Zip`] if the archive cannot be written.
pub async fn pack(assets: &[Asset], metadata: &str) -> Result<Vec<u8>, PackageError> {
    if assets.is_empty() {
        return Err(PackageError::Empty);
    }
    validate_names(assets)?;

    let mut writer = ZipFileWriter::new(Vec::new());
    for asset in assets {
        let builder = ZipEntryBuilder::new(asset.name.clone().into(), Compression::Deflate);
        writer.write_entry_whole(builder, &asset.bytes).await?;
    }
    let builder = ZipEntryBuilder::new(METADATA_ENTRY_NAME.to_string().into(), Compression::Deflate);
    writer.write_entry_whole(builder, metadata.as_bytes()).await?;

    let bytes = writer.close().await?;
    tracing::debug!(
        entries = assets.len() + 1,
        size_bytes = bytes.len(),
        "card archive packed"
    );
    Ok(bytes)
}

/// Chooses between a direct single-asset download and an archive.
///
/// # Errors
///
/// Same as [`pack`]; a single asset is still checked for a usable name.
pub async fn prepare_download(
    mut assets: Vec<Asset>,
    metadata: &str,
) -> Result<Download, PackageError> {
    match assets.len() {
        0 => Err(PackageError::Empty),
        1 => {
            validate_names(&assets)?;
            let asset = assets.remove(0);
            tracing::debug!(name = %asset.name, "single asset; skipping archive");
            Ok(Download::Single(asset))
        }
        _ => Ok(Download::Archive(pack(&assets, metadata).await?)),
    }
}

/// Entry names of a zip archive, in archive order.
///
/// # Errors
///
/// Returns [`PackageError::Zip`] if `archive` is not a readable zip or an
/// entry name is not valid UTF-8.
pub async fn list_entries(archive: Vec<u8>) -> Result<Vec<String>, PackageError> {
    let reader = ZipFileReader::new(archive).await?;
    reader
        .file()
        .entries()
        .iter()
        .map(|entry| Ok(entry.filename().as_str()?.to_string()))
        .collect()
}

/// Decompressed contents of the entry called `name`.
///
/// # Errors
///
/// - [`PackageError::MissingEntry`] if no entry has that name.
/// - [`PackageError::Zip`] if the archive or entry cannot be read.
pub async fn read_entry(archive: Vec<u8>, name: &str) -> Result<Vec<u8>, PackageError> {
    let reader = ZipFileReader::new(archive).await?;
    let index = reader
        .file()
        .entries()
        .iter()
        .position(|entry| entry.filename().as_str().is_ok_and(|n| n == name))
        .ok_or_else(|| PackageError::MissingEntry(name.to_string()))?;

    let mut entry = reader.reader_with_entry(index).await?;
    let mut bytes = Vec::new();
    entry.read_to_end_checked(&mut bytes).await?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_names_are_sanitized() {
        assert_eq!(asset_name("123", "modern", "svg"), "card-123-modern.svg");
        assert_eq!(asset_name("../x y", "bold", "svg"), "card-___x_y-bold.svg");
        assert_eq!(asset_name("", "bold", "png"), "card-_-bold.png");
    }

    #[test]
    fn archive_name_uses_item_id() {
        assert_eq!(archive_file_name("42"), "product-42-cards.zip");
    }

    #[test]
    fn rejects_path_like_names() {
        for name in ["", "/etc/passwd", "a/../b", "dir\\file", "a//b", "bad\nname"] {
            let assets = vec![Asset::new(name, b"x".to_vec())];
            assert!(
                matches!(validate_names(&assets), Err(PackageError::InvalidName { .. })),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn allows_nested_names() {
        let assets = vec![Asset::new("cards/modern.svg", b"x".to_vec())];
        assert!(validate_names(&assets).is_ok());
    }

    #[test]
    fn rejects_metadata_name_clash() {
        let assets = vec![Asset::new(METADATA_ENTRY_NAME, b"x".to_vec())];
        assert!(matches!(
            validate_names(&assets),
            Err(PackageError::DuplicateName(ref n)) if n == METADATA_ENTRY_NAME
        ));
    }
}
