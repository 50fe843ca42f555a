//! On-disk cache of derived icon assets.
//!
//! ### Layout
//!
//! One file per `(item id, variant)` in the cache directory:
//!
//! - `{id}_light.svg`: light icon, verbatim
//! - `{id}_dark_raw.svg`: dark icon, verbatim (what the clipboard gets)
//! - `{id}_dark.svg`: dark icon as displayed, background optionally injected
//! - `{id}_dark.bg`: marker present only when `{id}_dark.svg` carries the
//!   background; holds the transform fingerprint
//!
//! ### Validity
//!
//! Each file's age comes from its modification time and is checked against
//! the asset lifetime independently. The displayed dark file is additionally
//! regenerated whenever its marker disagrees with the current setting, which
//! never touches the raw file.
//!
//! ### Concurrency
//!
//! Resolution of a given `(id, variant)` is serialized by a per-key async
//! lock, so concurrent queries for the same icon fetch it once. Files are
//! written to a temporary name and renamed into place.

pub mod transform;

pub use transform::{BACKGROUND_PRIMITIVE, background_fingerprint, derive_dark, has_background, inject_background};

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use svgl_core::{CacheLifetime, Error, Item, SearchSettings, Theme, Variant};

use crate::api::AssetSource;

const ASSET_EXTENSION: &str = "svg";
const MARKER_EXTENSION: &str = "bg";

/// Files backing one result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// File shown as the entry icon.
    pub icon: PathBuf,
    /// File whose contents are copied when the entry is invoked.
    pub copy: PathBuf,
}

type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// Derived-asset cache rooted at one directory.
pub struct DerivedAssetStore {
    dir: PathBuf,
    source: Arc<dyn AssetSource>,
    locks: Mutex<HashMap<(u64, Variant), KeyLock>>,
    write_seq: AtomicU64,
}

impl std::fmt::Debug for DerivedAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedAssetStore")
            .field("dir", &self.dir)
            .field("source", &"<asset source>")
            .finish()
    }
}

impl DerivedAssetStore {
    pub fn new(dir: impl Into<PathBuf>, source: Arc<dyn AssetSource>) -> Self {
        Self { dir: dir.into(), source, locks: Mutex::new(HashMap::new()), write_seq: AtomicU64::new(0) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the stored file for `(id, variant)`.
    pub fn path_for(&self, id: u64, variant: Variant) -> PathBuf {
        self.dir.join(format!("{id}_{}.{ASSET_EXTENSION}", variant.file_suffix()))
    }

    /// Path of the background marker of item `id`.
    pub fn marker_path(&self, id: u64) -> PathBuf {
        self.dir
            .join(format!("{id}_{}.{MARKER_EXTENSION}", Variant::DarkTransformed.file_suffix()))
    }

    /// Make sure the files for one entry of `item` exist and are current.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetFetch` naming the item on any fetch, decode or
    /// write failure.
    pub async fn resolve(&self, item: &Item, theme: Theme, settings: &SearchSettings) -> Result<AssetPaths, Error> {
        match theme {
            Theme::Light => {
                let path = self.ensure_fetched(item, Variant::Light, settings.asset_lifetime).await?;
                Ok(AssetPaths { icon: path.clone(), copy: path })
            }
            Theme::Dark => {
                let raw = self.ensure_fetched(item, Variant::DarkRaw, settings.asset_lifetime).await?;
                let icon = self.ensure_dark(item.id, &raw, settings).await?;
                Ok(AssetPaths { icon, copy: raw })
            }
        }
    }

    /// Raw SVG text of a cached icon, as copied to the clipboard.
    pub async fn raw_content(&self, id: u64, theme: Theme) -> Result<String, Error> {
        let path = self.path_for(id, theme.raw_variant());
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::CacheMiss(format!("{id}/{}", theme.as_str()))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every stored asset and marker, returning how many SVG files
    /// were removed.
    pub async fn clear(&self) -> Result<usize, Error> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_asset = path.extension().is_some_and(|ext| ext == ASSET_EXTENSION);
            let is_marker = path.extension().is_some_and(|ext| ext == MARKER_EXTENSION);
            if !(is_asset || is_marker) {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) if is_asset => removed += 1,
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to delete cached asset"),
            }
        }

        // locks still held by a running resolution stay
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);

        tracing::debug!(removed, dir = %self.dir.display(), "cleared asset cache");
        Ok(removed)
    }

    fn key_lock(&self, id: u64, variant: Variant) -> KeyLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry((id, variant)).or_default().clone()
    }

    async fn ensure_fetched(&self, item: &Item, variant: Variant, lifetime: CacheLifetime) -> Result<PathBuf, Error> {
        let lock = self.key_lock(item.id, variant);
        let _guard = lock.lock().await;

        let path = self.path_for(item.id, variant);
        if is_fresh(&path, lifetime).await {
            return Ok(path);
        }

        let url = item.asset_url(variant);
        let bytes = self
            .source
            .fetch_asset(url)
            .await
            .map_err(|e| asset_error(item.id, format!("fetching {url}: {e}")))?;

        self.write_atomic(&path, &bytes)
            .await
            .map_err(|e| asset_error(item.id, format!("writing {}: {e}", path.display())))?;

        tracing::debug!(item_id = item.id, variant = variant.file_suffix(), "stored asset");
        Ok(path)
    }

    async fn ensure_dark(&self, id: u64, raw_path: &Path, settings: &SearchSettings) -> Result<PathBuf, Error> {
        let lock = self.key_lock(id, Variant::DarkTransformed);
        let _guard = lock.lock().await;

        let path = self.path_for(id, Variant::DarkTransformed);
        let marker = self.marker_path(id);
        let wanted = settings.add_dark_background.then(background_fingerprint);

        if is_fresh(&path, settings.asset_lifetime).await && read_marker(&marker).await == wanted {
            return Ok(path);
        }

        let raw = tokio::fs::read(raw_path)
            .await
            .map_err(|e| asset_error(id, format!("reading {}: {e}", raw_path.display())))?;
        let raw = String::from_utf8(raw).map_err(|e| asset_error(id, format!("asset is not UTF-8: {e}")))?;
        let derived = derive_dark(&raw, settings.add_dark_background);
        // no marker when the raw file has no open root element to inject into
        let injected = wanted.filter(|_| has_background(&derived));

        let write = async {
            remove_if_exists(&marker).await?;
            self.write_atomic(&path, derived.as_bytes()).await?;
            if let Some(fingerprint) = &injected {
                self.write_atomic(&marker, fingerprint.as_bytes()).await?;
            }
            Ok::<_, std::io::Error>(())
        };
        write
            .await
            .map_err(|e| asset_error(id, format!("writing {}: {e}", path.display())))?;

        tracing::debug!(item_id = id, background = injected.is_some(), "derived dark asset");
        Ok(path)
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(format!(".{}.{seq}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

fn asset_error(item_id: u64, reason: String) -> Error {
    Error::AssetFetch { item_id, reason }
}

/// Whether `path` exists and is younger than `lifetime`.
async fn is_fresh(path: &Path, lifetime: CacheLifetime) -> bool {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return false;
    };
    if !lifetime.expires() {
        return true;
    }

    let Ok(modified) = metadata.modified() else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    let age = Utc::now()
        .signed_duration_since(modified)
        .to_std()
        .unwrap_or(Duration::ZERO);

    !lifetime.is_elapsed(age)
}

async fn read_marker(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|s| s.trim().to_string())
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
