//! Query orchestration.
//!
//! [`IconSearch`] owns every piece of shared state of the pipeline (result
//! cache, rate limit window, debounce register, asset store) and turns one
//! raw query string into a [`ResultSet`]:
//!
//! 1. blank query: a single prompt entry, nothing else happens
//! 2. cache hit: supersede older queries, materialize the cached items
//! 3. miss: wait out the debounce interval (skipped when it is zero), pass
//!    the rate limiter, search
//! 4. failure: one explanatory entry; cancellation: an empty set
//! 5. success: cache, sweep, then two entries (light, dark) per item

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use svgl_core::{AppConfig, Error, ExpiringCache, Item, ResultEntry, ResultSet, SearchSettings, Theme};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::{AssetSource, IconApi, SvglClient, SvglConfig};
use crate::assets::DerivedAssetStore;
use crate::debounce::Debouncer;
use crate::limiter::{RateLimitConfig, RateLimiter};

/// Search items as returned by the API; shared, never mutated once cached.
type CachedItems = Arc<Vec<Item>>;

/// Query-coalescing front end of the icon search API.
pub struct IconSearch {
    api: Arc<dyn IconApi>,
    assets: DerivedAssetStore,
    cache: ExpiringCache<CachedItems>,
    limiter: RateLimiter,
    debouncer: Debouncer,
    settings: RwLock<SearchSettings>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for IconSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconSearch")
            .field("assets", &self.assets)
            .field("limiter", &self.limiter)
            .field("settings", &self.settings())
            .finish_non_exhaustive()
    }
}

impl IconSearch {
    pub fn new(
        api: Arc<dyn IconApi>, source: Arc<dyn AssetSource>, cache_dir: impl Into<PathBuf>, limits: RateLimitConfig,
        settings: SearchSettings,
    ) -> Self {
        let shutdown = CancellationToken::new();
        Self {
            api,
            assets: DerivedAssetStore::new(cache_dir, source),
            cache: ExpiringCache::new(settings.cache_lifetime),
            limiter: RateLimiter::new(limits),
            debouncer: Debouncer::new(shutdown.clone()),
            settings: RwLock::new(settings),
            shutdown,
        }
    }

    /// Build the pipeline against the real SVGL API.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the configured base URL is unusable,
    /// or `Error::Network` if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = Arc::new(SvglClient::new(SvglConfig::from(config))?);
        Ok(Self::new(
            client.clone(),
            client,
            config.cache_dir.clone(),
            RateLimitConfig::from(config),
            config.search_settings(),
        ))
    }

    /// Settings the next query will use.
    pub fn settings(&self) -> SearchSettings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap the runtime settings. Queries already running keep the old ones.
    pub async fn update_settings(&self, settings: SearchSettings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        self.cache.set_lifetime(settings.cache_lifetime).await;
        tracing::debug!(?settings, "search settings updated");
    }

    /// Directory holding the derived assets.
    pub fn cache_dir(&self) -> &Path {
        self.assets.dir()
    }

    /// Resolve one raw query into result entries.
    ///
    /// Never fails: errors become a single explanatory entry, and a query
    /// superseded by a newer one resolves to an empty set.
    pub async fn query(&self, raw: &str) -> ResultSet {
        let term = raw.trim();
        if term.is_empty() {
            return vec![ResultEntry::prompt()];
        }

        let settings = self.settings();

        if let Some(items) = self.cache.get(term).await {
            tracing::debug!(query = term, items = items.len(), "search cache hit");
            self.debouncer.supersede(term);
            return self.present(term, &items, &settings).await;
        }

        match self.search(term, &settings).await {
            Ok(entries) => entries,
            Err(e) => {
                if !e.is_canceled() {
                    tracing::debug!(query = term, error = %e, "search failed");
                }
                ResultEntry::from_error(&e).into_iter().collect()
            }
        }
    }

    async fn search(&self, term: &str, settings: &SearchSettings) -> Result<ResultSet, Error> {
        // a zero interval skips the scheduler: nothing supersedes the fetch
        let (token, _flight) = if settings.debounce_interval.is_zero() {
            (self.shutdown.child_token(), None)
        } else {
            let flight = self.debouncer.submit(term, settings.debounce_interval).settle().await?;
            (flight.token().clone(), Some(flight))
        };

        // an identical query may have filled the cache while this one waited
        let items = match self.cache.get(term).await {
            Some(items) => items,
            None => self.fetch(term, settings, &token).await?,
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Canceled),
            entries = self.present(term, &items, settings) => Ok(entries),
        }
    }

    async fn fetch(
        &self, term: &str, settings: &SearchSettings, token: &CancellationToken,
    ) -> Result<CachedItems, Error> {
        self.limiter.acquire(token).await?;

        let start = Instant::now();
        let items = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(Error::Canceled),
            result = self.api.search(term) => result?,
        };
        tracing::debug!(query = term, items = items.len(), elapsed = ?start.elapsed(), "search completed");

        let items = Arc::new(items);
        if settings.cache_lifetime.expires() {
            self.cache.put(term, items.clone()).await;
        }
        self.cache.sweep_expired().await;

        Ok(items)
    }

    async fn present(&self, term: &str, items: &[Item], settings: &SearchSettings) -> ResultSet {
        if items.is_empty() {
            return vec![ResultEntry::no_results(term)];
        }

        let shown = items.len().min(settings.max_results);
        let mut entries = Vec::with_capacity(shown * 2);
        for item in &items[..shown] {
            match self.resolve_item(item, settings).await {
                Ok(pair) => entries.extend(pair),
                Err(e) => tracing::warn!(item_id = item.id, title = %item.title, error = %e, "skipping icon"),
            }
        }
        entries
    }

    async fn resolve_item(&self, item: &Item, settings: &SearchSettings) -> Result<[ResultEntry; 2], Error> {
        let light = self.assets.resolve(item, Theme::Light, settings).await?;
        let dark = self.assets.resolve(item, Theme::Dark, settings).await?;
        Ok([
            ResultEntry::icon(item, Theme::Light, light.icon, light.copy),
            ResultEntry::icon(item, Theme::Dark, dark.icon, dark.copy),
        ])
    }

    /// Drop cached search results and every stored asset.
    ///
    /// Returns the number of SVG files deleted.
    pub async fn clear_cache(&self) -> Result<usize, Error> {
        self.cache.clear().await;
        let removed = self.assets.clear().await?;
        tracing::info!(removed, "search and asset caches cleared");
        Ok(removed)
    }

    /// Raw SVG text that copying the given entry puts on the clipboard.
    pub async fn copy_content(&self, item_id: u64, theme: Theme) -> Result<String, Error> {
        self.assets.raw_content(item_id, theme).await
    }

    /// Cancel every pending and in-flight query. Later queries resolve to an
    /// empty set unless they hit the cache.
    pub fn shutdown(&self) {
        self.debouncer.cancel_all();
        self.shutdown.cancel();
    }
}
