//
// icon_source.rs
//
// CDN-backed icon resolution with a process-wide image cache
//

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::Instant;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lru::LruCache;

use crate::config::PreviewConfig;
use crate::host::IconResolver;

/// Default capacity for the icon image cache
const DEFAULT_ICON_CACHE_CAPACITY: usize = 2048;

/// Fetches icon SVGs from a CDN and converts them to embeddable data URLs.
///
/// Results are cached process-wide, keyed by the full CDN URL (which folds
/// subpackage, version, and icon name together). Reads use `peek()` so the
/// hot path stays concurrent; eviction is LRU by insertion/update time.
/// Overlapping resolutions of the same key are idempotent last-write-wins,
/// payloads for the same key being identical.
pub struct CdnIconResolver {
    client: reqwest::Client,
    cache: RwLock<LruCache<String, String>>,
    cdn_base_url: String,
    icon_version: String,
}

impl std::fmt::Debug for CdnIconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnIconResolver").finish_non_exhaustive()
    }
}

impl CdnIconResolver {
    pub fn new(config: &PreviewConfig) -> Self {
        Self::with_capacity(config, DEFAULT_ICON_CACHE_CAPACITY)
    }

    pub fn with_capacity(config: &PreviewConfig, cap: usize) -> Self {
        let cap = NonZeroUsize::new(cap)
            .unwrap_or(NonZeroUsize::new(DEFAULT_ICON_CACHE_CAPACITY).unwrap());
        Self {
            client: reqwest::Client::new(),
            cache: RwLock::new(LruCache::new(cap)),
            cdn_base_url: config.cdn_base_url.clone(),
            icon_version: config.icon_version.clone(),
        }
    }

    /// CDN URL for an icon: `{base}/{subpackage}@{version}/{IconName}.svg`.
    /// The subpackage is the segment after `/` in the package token; assets
    /// for every family are served from the configured mirror.
    fn icon_url(&self, icon_name: &str, package_name: &str) -> String {
        let subpackage = package_name.split('/').nth(1).unwrap_or(package_name);
        format!(
            "{}/{}@{}/{}.svg",
            self.cdn_base_url, subpackage, self.icon_version, icon_name
        )
    }

    fn cached(&self, url: &str) -> Option<String> {
        self.cache.read().ok()?.peek(url).cloned()
    }

    fn store(&self, url: String, data_url: String) {
        if let Ok(mut guard) = self.cache.write() {
            guard.push(url, data_url);
        }
    }

    async fn fetch_svg(&self, url: &str) -> anyhow::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl IconResolver for CdnIconResolver {
    async fn resolve_icon(&self, icon_name: &str, package_name: &str) -> String {
        let url = self.icon_url(icon_name, package_name);

        if let Some(hit) = self.cached(&url) {
            return hit;
        }

        log::debug!("request svg -> {}", url);
        let start = Instant::now();

        match self.fetch_svg(&url).await {
            Ok(svg) => {
                log::debug!("requested {} in {:?}", url, start.elapsed());
                let data_url = svg_data_url(&svg);
                self.store(url, data_url.clone());
                data_url
            }
            Err(e) => {
                log::warn!("request {} failed after {:?}: {}", url, start.elapsed(), e);
                String::new()
            }
        }
    }
}

/// Embed an SVG document as a base64 data URL.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CdnIconResolver {
        CdnIconResolver::new(&PreviewConfig::default())
    }

    #[test]
    fn icon_url_uses_subpackage_and_version() {
        let url = resolver().icon_url("AddOutline", "@vicons/ionicons5");
        assert_eq!(url, "https://unpkg.com/@sicons/ionicons5@0.12.0/AddOutline.svg");
    }

    #[test]
    fn icon_url_falls_back_to_full_token_without_slash() {
        let url = resolver().icon_url("Add", "ionicons5");
        assert_eq!(url, "https://unpkg.com/@sicons/ionicons5@0.12.0/Add.svg");
    }

    #[test]
    fn svg_data_url_encodes_base64() {
        assert_eq!(svg_data_url("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[tokio::test]
    async fn cached_result_short_circuits_fetch() {
        let resolver = resolver();
        let url = resolver.icon_url("AddOutline", "@vicons/ionicons5");
        resolver.store(url, "data:cached".to_string());

        // No network involved: the cache answers instantly.
        let got = resolver.resolve_icon("AddOutline", "@vicons/ionicons5").await;
        assert_eq!(got, "data:cached");
    }

    #[test]
    fn cache_evicts_least_recently_inserted() {
        let resolver = CdnIconResolver::with_capacity(&PreviewConfig::default(), 1);
        resolver.store("a".to_string(), "1".to_string());
        resolver.store("b".to_string(), "2".to_string());
        assert!(resolver.cached("a").is_none());
        assert_eq!(resolver.cached("b"), Some("2".to_string()));
    }
}
