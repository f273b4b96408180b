//! Icon catalog service / 图标目录服务
//!
//! Components / 组件：
//! - client: outbound HTTP, no state / 远程请求
//! - cache: TTL-bound mirror of the catalog index / 目录缓存
//! - ranking: relevance search over the cached index / 相关性搜索
//! - federated: live Iconify search for two fixed icon sets / 联合搜索
//! - import: format-fallback fetch into data URIs / 图标导入
//!
//! Call direction: API → IconService → (cache | federated | import) → client

pub mod cache;
pub mod client;
pub mod error;
pub mod federated;
pub mod import;
pub mod ranking;
pub mod types;

pub use cache::{CatalogCache, Clock, SystemClock};
pub use client::{FetchError, HttpIconFetcher, IconFetcher, RemoteResponse};
pub use error::IconError;
pub use federated::{FederatedProvider, FederatedSearch, MIN_QUERY_CHARS};
pub use import::IconImporter;
pub use types::{CatalogEntry, IconFormat, IconSource, ImportedIcon, SearchResult};

use std::sync::Arc;

use crate::config::IconConfig;

/// Entry point used by the HTTP layer / 供 HTTP 层调用的入口
pub struct IconService {
    cache: Arc<CatalogCache>,
    federated: FederatedSearch,
    importer: IconImporter,
    raw_base: String,
    max_limit: usize,
}

impl IconService {
    /// Build the service with real network access and wall-clock time / 使用真实网络构建
    pub fn from_config(config: &IconConfig) -> anyhow::Result<Self> {
        let fetcher = Arc::new(HttpIconFetcher::new(config.fetch_timeout_secs)?);
        Ok(Self::new(config, fetcher, Arc::new(SystemClock)))
    }

    pub fn new(config: &IconConfig, fetcher: Arc<dyn IconFetcher>, clock: Arc<dyn Clock>) -> Self {
        let cache = Arc::new(CatalogCache::new(
            fetcher.clone(),
            clock,
            config.index_url.clone(),
            config.index_ttl_secs,
        ));
        Self {
            federated: FederatedSearch::new(fetcher.clone(), config.iconify_api_base.clone()),
            importer: IconImporter::new(
                cache.clone(),
                fetcher,
                config.raw_base.clone(),
                config.iconify_api_base.clone(),
            ),
            cache,
            raw_base: config.raw_base.clone(),
            max_limit: config.search_max_limit.max(1),
        }
    }

    /// Clamp a requested limit into `1..=max` / 限制结果数量
    pub fn clamp_limit(&self, limit: i64) -> usize {
        limit.clamp(1, self.max_limit as i64) as usize
    }

    /// Search one source / 搜索指定来源
    pub async fn search(
        &self,
        query: &str,
        limit: i64,
        source: IconSource,
    ) -> Result<Vec<SearchResult>, IconError> {
        let limit = self.clamp_limit(limit);
        match FederatedProvider::for_source(source) {
            Some(provider) => self.federated.search(provider, query, limit).await,
            None => {
                let items = self.cache.get_index().await?;
                Ok(ranking::rank(&items, query, limit, &self.raw_base))
            }
        }
    }

    /// Import an icon, dispatching on the source hint / 按来源导入图标
    ///
    /// An empty hint picks Iconify when the reference carries a `prefix:`.
    pub async fn import(
        &self,
        reference: &str,
        preferred_format: &str,
        source_hint: &str,
    ) -> Result<ImportedIcon, IconError> {
        let format = IconFormat::from_preference(preferred_format);
        let hint = IconSource::parse_strict(source_hint);
        match hint {
            Some(IconSource::Selfhst) => self.importer.import_catalog(reference, format).await,
            Some(source) => self.importer.import_federated(reference, format, Some(source)).await,
            None if reference.contains(':') => {
                self.importer.import_federated(reference, format, None).await
            }
            None => self.importer.import_catalog(reference, format).await,
        }
    }

    pub async fn import_catalog(&self, reference: &str, preferred_format: &str) -> Result<ImportedIcon, IconError> {
        self.importer
            .import_catalog(reference, IconFormat::from_preference(preferred_format))
            .await
    }

    pub async fn import_federated(
        &self,
        name: &str,
        preferred_format: &str,
        source_hint: &str,
    ) -> Result<ImportedIcon, IconError> {
        self.importer
            .import_federated(
                name,
                IconFormat::from_preference(preferred_format),
                IconSource::parse_strict(source_hint),
            )
            .await
    }
}
