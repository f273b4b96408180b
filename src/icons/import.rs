//! Icon import resolver / 图标导入
//!
//! Turns a chosen icon reference into an embeddable data URI. Catalog icons walk
//! an ordered list of format candidates; Iconify icons are fetched by URL with a
//! single PNG to SVG retry.

use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::cache::CatalogCache;
use super::client::{FetchError, IconFetcher, RemoteResponse};
use super::error::IconError;
use super::federated::{display_label, IconId};
use super::ranking::asset_url;
use super::types::{CatalogEntry, IconFormat, IconSource, ImportedIcon};

const MAX_REFERENCE_LEN: usize = 180;

static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._/-]+$").expect("valid reference regex"));

/// Outcome of one candidate fetch / 单次候选请求结果
enum Attempt {
    Hit(RemoteResponse),
    /// Keep going; carries the error worth reporting if everything misses
    Miss(Option<String>),
    Abort(IconError),
}

pub struct IconImporter {
    cache: Arc<CatalogCache>,
    fetcher: Arc<dyn IconFetcher>,
    raw_base: String,
    iconify_base: String,
}

impl IconImporter {
    pub fn new(
        cache: Arc<CatalogCache>,
        fetcher: Arc<dyn IconFetcher>,
        raw_base: impl Into<String>,
        iconify_base: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            raw_base: raw_base.into(),
            iconify_base: iconify_base.into(),
        }
    }

    /// Import a catalog icon / 导入目录图标
    pub async fn import_catalog(
        &self,
        reference: &str,
        preferred: IconFormat,
    ) -> Result<ImportedIcon, IconError> {
        let reference = reference.trim();
        validate_reference(reference)?;

        let entry = self
            .cache
            .find(reference)
            .await?
            .ok_or_else(|| IconError::NotFound(reference.to_string()))?;

        let candidates = format_candidates(&entry, preferred);
        if candidates.is_empty() {
            return Err(IconError::UnsupportedFormat);
        }

        let mut last_error = None;
        for format in candidates {
            let url = asset_url(&self.raw_base, &entry.reference, format.ext());
            match self.attempt(&url).await {
                Attempt::Hit(resp) => {
                    let (content_type, icon_data) = embed(&resp, format);
                    return Ok(ImportedIcon {
                        name: entry.name.clone(),
                        reference: entry.reference.clone(),
                        icon: format!("{}.{}", entry.reference, format.ext()),
                        icon_data,
                        format,
                        content_type,
                        source: IconSource::Selfhst,
                    });
                }
                Attempt::Miss(error) => {
                    tracing::debug!("Icon candidate missed: {} ({:?})", url, error);
                    if error.is_some() {
                        last_error = error;
                    }
                }
                Attempt::Abort(e) => return Err(e),
            }
        }

        Err(IconError::FetchFailed(last_error))
    }

    /// Import an Iconify icon / 导入 Iconify 图标
    pub async fn import_federated(
        &self,
        raw_id: &str,
        preferred: IconFormat,
        hint: Option<IconSource>,
    ) -> Result<ImportedIcon, IconError> {
        let id = IconId::parse(raw_id, hint)?;

        let mut format = preferred;
        let resp = match self.fetcher.get(&id.asset_url(&self.iconify_base, format.ext())).await {
            Ok(resp) => resp,
            Err(FetchError::NotFound) if format == IconFormat::Png => {
                tracing::debug!("{} has no PNG, retrying as SVG", id.reference());
                format = IconFormat::Svg;
                self.fetcher
                    .get(&id.asset_url(&self.iconify_base, format.ext()))
                    .await
                    .map_err(fetch_failed)?
            }
            Err(e) => return Err(fetch_failed(e)),
        };

        if resp.body.is_empty() {
            return Err(IconError::FetchFailed(Some(
                "Icon source returned empty data.".to_string(),
            )));
        }

        let (content_type, icon_data) = embed(&resp, format);
        Ok(ImportedIcon {
            name: display_label(&id.name),
            reference: id.reference(),
            icon: format!("{}.{}", id.name, format.ext()),
            icon_data,
            format,
            content_type,
            source: id.provider.source,
        })
    }

    /// 404, empty bodies and transport errors are soft misses; other statuses abort
    async fn attempt(&self, url: &str) -> Attempt {
        match self.fetcher.get(url).await {
            Ok(resp) if resp.body.is_empty() => Attempt::Miss(None),
            Ok(resp) => Attempt::Hit(resp),
            Err(FetchError::NotFound) => Attempt::Miss(Some(FetchError::NotFound.to_string())),
            Err(FetchError::Transport(e)) => Attempt::Miss(Some(e)),
            Err(e @ FetchError::Status(_)) => Attempt::Abort(fetch_failed(e)),
        }
    }
}

fn fetch_failed(e: FetchError) -> IconError {
    IconError::FetchFailed(Some(e.to_string()))
}

/// Reject references that could escape the asset path / 校验目录引用
pub fn validate_reference(reference: &str) -> Result<(), IconError> {
    let valid = !reference.is_empty()
        && reference.len() <= MAX_REFERENCE_LEN
        && !reference.starts_with('/')
        && !reference.contains('\\')
        && !reference.contains("..")
        && REFERENCE_RE.is_match(reference);
    if valid {
        Ok(())
    } else {
        Err(IconError::InvalidReference("Invalid icon reference.".to_string()))
    }
}

/// Preferred format first when available, then the other one / 候选格式顺序
pub fn format_candidates(entry: &CatalogEntry, preferred: IconFormat) -> Vec<IconFormat> {
    [preferred, preferred.other()]
        .into_iter()
        .filter(|format| entry.supports(*format))
        .collect()
}

/// Build `(content_type, data_uri)` for a fetched asset / 生成 data URI
pub fn embed(resp: &RemoteResponse, format: IconFormat) -> (String, String) {
    let content_type = resp
        .media_type()
        .unwrap_or_else(|| format.default_content_type().to_string());
    let encoded = base64::engine::general_purpose::STANDARD.encode(&resp.body);
    let data = format!("data:{};base64,{}", content_type, encoded);
    (content_type, data)
}
