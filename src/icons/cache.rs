//! Catalog cache - in-memory mirror of the remote icon index / 目录缓存
//!
//! The snapshot is replaced wholesale on refresh and never mutated in place.
//! Network I/O never happens while the snapshot lock is held; concurrent stale
//! readers share a single in-flight refresh through an async gate.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use super::client::IconFetcher;
use super::error::IconError;
use super::types::CatalogEntry;

/// Time source in unix seconds / 时间源（秒）
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock / 系统时钟
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[derive(Clone, Default)]
struct Snapshot {
    items: Arc<Vec<CatalogEntry>>,
    fetched_at: i64,
}

impl Snapshot {
    fn is_fresh(&self, now: i64, ttl_secs: i64) -> bool {
        !self.items.is_empty() && now - self.fetched_at < ttl_secs
    }
}

pub struct CatalogCache {
    fetcher: Arc<dyn IconFetcher>,
    clock: Arc<dyn Clock>,
    index_url: String,
    ttl_secs: i64,
    snapshot: Mutex<Snapshot>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl CatalogCache {
    pub fn new(
        fetcher: Arc<dyn IconFetcher>,
        clock: Arc<dyn Clock>,
        index_url: impl Into<String>,
        ttl_secs: i64,
    ) -> Self {
        Self {
            fetcher,
            clock,
            index_url: index_url.into(),
            ttl_secs,
            snapshot: Mutex::new(Snapshot::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Current index, refreshing first when stale or empty / 获取索引，过期时刷新
    pub async fn get_index(&self) -> Result<Arc<Vec<CatalogEntry>>, IconError> {
        if let Some(items) = self.fresh_items() {
            return Ok(items);
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have refreshed while we waited / 等待期间可能已被刷新
        if let Some(items) = self.fresh_items() {
            return Ok(items);
        }

        let started_at = self.clock.now();
        let items = match self.fetch_index().await {
            Ok(items) => Arc::new(items),
            Err(e) => {
                tracing::warn!("Icon index refresh failed: {}", e);
                return Err(e);
            }
        };

        tracing::info!("Icon index refreshed: {} entries", items.len());
        *self.snapshot.lock() = Snapshot {
            items: items.clone(),
            fetched_at: started_at,
        };
        Ok(items)
    }

    /// Case-insensitive exact lookup on `reference`, first match wins / 按引用查找
    pub async fn find(&self, reference: &str) -> Result<Option<CatalogEntry>, IconError> {
        let wanted = reference.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        let items = self.get_index().await?;
        Ok(items
            .iter()
            .find(|item| item.reference.to_lowercase() == wanted)
            .cloned())
    }

    fn fresh_items(&self) -> Option<Arc<Vec<CatalogEntry>>> {
        let now = self.clock.now();
        let snapshot = self.snapshot.lock();
        if snapshot.is_fresh(now, self.ttl_secs) {
            Some(snapshot.items.clone())
        } else {
            None
        }
    }

    async fn fetch_index(&self) -> Result<Vec<CatalogEntry>, IconError> {
        let resp = self
            .fetcher
            .get(&self.index_url)
            .await
            .map_err(|e| IconError::SourceUnavailable(e.to_string()))?;
        parse_index(&resp.body)
    }
}

/// Parse an index document into normalised entries / 解析索引文档
pub fn parse_index(body: &[u8]) -> Result<Vec<CatalogEntry>, IconError> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| IconError::SourceUnavailable(format!("invalid icon index: {}", e)))?;

    let rows = match parsed {
        Value::Array(rows) => rows,
        _ => {
            return Err(IconError::SourceUnavailable(
                "Unexpected icon index format.".to_string(),
            ))
        }
    };

    Ok(rows.iter().filter_map(normalize_entry).collect())
}

/// Normalise one upstream row; rows without a reference are dropped / 规范化一行
pub fn normalize_entry(row: &Value) -> Option<CatalogEntry> {
    let row = row.as_object()?;
    let text = |key: &str| row.get(key).map(field_text).unwrap_or_default();
    let flag = |key: &str| row.get(key).map(is_truthy).unwrap_or(false);

    let reference = text("Reference");
    if reference.is_empty() {
        return None;
    }

    let mut name = text("Name");
    if name.is_empty() {
        name = reference.clone();
    }

    Some(CatalogEntry {
        name,
        category: text("Category"),
        tags: text("Tags"),
        has_svg: flag("SVG"),
        has_png: flag("PNG"),
        has_webp: flag("WebP"),
        has_light: flag("Light"),
        has_dark: flag("Dark"),
        reference,
    })
}

/// Stringify a scalar field and trim it / 标量转字符串
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        // `false` counts as a missing value
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

/// Exactly "y", "yes", "true" and "1", case-insensitive / 真值判断
fn is_truthy(value: &Value) -> bool {
    matches!(
        field_text(value).to_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Manually advanced clock / 手动时钟
    pub struct ManualClock(AtomicI64);

    impl ManualClock {
        pub fn new(start: i64) -> Self {
            Self(AtomicI64::new(start))
        }

        pub fn advance(&self, secs: i64) {
            self.0.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }
}
