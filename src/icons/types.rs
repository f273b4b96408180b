//! Icon data model / 图标数据模型

use serde::{Deserialize, Serialize};

/// Icon source selector / 图标来源
///
/// The local catalog is mirrored in memory; the two Iconify sources are queried live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSource {
    /// selfh.st catalog (cached index) / selfh.st 图标目录
    Selfhst,
    /// Iconify `simple-icons` set
    IconifySimple,
    /// Iconify `logos` set
    IconifyLogos,
}

impl IconSource {
    /// Parse a caller-supplied selector, unknown values fall back to the catalog / 未知值回退到本地目录
    pub fn parse(value: &str) -> Self {
        Self::parse_strict(value).unwrap_or(IconSource::Selfhst)
    }

    /// Parse a selector, returning `None` for unknown values / 严格解析
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "selfhst" | "local" => Some(IconSource::Selfhst),
            "iconify-simple" => Some(IconSource::IconifySimple),
            "iconify-logos" => Some(IconSource::IconifyLogos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconSource::Selfhst => "selfhst",
            IconSource::IconifySimple => "iconify-simple",
            IconSource::IconifyLogos => "iconify-logos",
        }
    }
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embeddable icon format / 可嵌入的图标格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    Svg,
    Png,
}

impl IconFormat {
    /// `png` selects PNG, anything else normalises to SVG / 非 png 一律视为 svg
    pub fn from_preference(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("png") {
            IconFormat::Png
        } else {
            IconFormat::Svg
        }
    }

    pub fn ext(&self) -> &'static str {
        match self {
            IconFormat::Svg => "svg",
            IconFormat::Png => "png",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            IconFormat::Svg => IconFormat::Png,
            IconFormat::Png => IconFormat::Svg,
        }
    }

    /// MIME type used when the remote omits Content-Type / 远端未返回 Content-Type 时的默认值
    pub fn default_content_type(&self) -> &'static str {
        match self {
            IconFormat::Svg => "image/svg+xml",
            IconFormat::Png => "image/png",
        }
    }
}

/// One normalised row of the catalog index / 目录索引中的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub reference: String,
    pub category: String,
    pub tags: String,
    pub has_svg: bool,
    pub has_png: bool,
    pub has_webp: bool,
    pub has_light: bool,
    pub has_dark: bool,
}

impl CatalogEntry {
    pub fn supports(&self, format: IconFormat) -> bool {
        match format {
            IconFormat::Svg => self.has_svg,
            IconFormat::Png => self.has_png,
        }
    }

    /// Best format for previews: SVG first, then PNG / 预览格式优先 SVG
    pub fn preview_format(&self) -> Option<IconFormat> {
        if self.has_svg {
            Some(IconFormat::Svg)
        } else if self.has_png {
            Some(IconFormat::Png)
        } else {
            None
        }
    }
}

/// Search hit returned to callers / 搜索结果
///
/// `score` and the availability flags are only present for catalog hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub name: String,
    pub reference: String,
    pub category: String,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_svg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_png: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_webp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_light: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_dark: Option<bool>,
    pub preview_url: String,
    pub source: IconSource,
}

impl SearchResult {
    pub fn from_catalog(entry: &CatalogEntry, score: i64, preview_url: String) -> Self {
        Self {
            score: Some(score),
            name: entry.name.clone(),
            reference: entry.reference.clone(),
            category: entry.category.clone(),
            tags: entry.tags.clone(),
            has_svg: Some(entry.has_svg),
            has_png: Some(entry.has_png),
            has_webp: Some(entry.has_webp),
            has_light: Some(entry.has_light),
            has_dark: Some(entry.has_dark),
            preview_url,
            source: IconSource::Selfhst,
        }
    }
}

/// Icon resolved into an embeddable payload / 已解析为可嵌入数据的图标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedIcon {
    pub name: String,
    pub reference: String,
    /// File name, `<ref>.<ext>` / 文件名
    pub icon: String,
    /// `data:<mime>;base64,<payload>`
    pub icon_data: String,
    pub format: IconFormat,
    pub content_type: String,
    pub source: IconSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!(IconSource::parse("iconify-simple"), IconSource::IconifySimple);
        assert_eq!(IconSource::parse(" ICONIFY-LOGOS "), IconSource::IconifyLogos);
        assert_eq!(IconSource::parse("unknown"), IconSource::Selfhst);
        assert_eq!(IconSource::parse_strict("unknown"), None);
        assert_eq!(IconSource::parse_strict(""), None);
    }

    #[test]
    fn test_format_preference() {
        assert_eq!(IconFormat::from_preference("PNG"), IconFormat::Png);
        assert_eq!(IconFormat::from_preference("svg"), IconFormat::Svg);
        assert_eq!(IconFormat::from_preference("webp"), IconFormat::Svg);
        assert_eq!(IconFormat::Png.other(), IconFormat::Svg);
    }

    #[test]
    fn test_federated_result_omits_local_fields() {
        let result = SearchResult {
            score: None,
            name: "Github".to_string(),
            reference: "simple-icons:github".to_string(),
            category: "Simple Icons".to_string(),
            tags: String::new(),
            has_svg: None,
            has_png: None,
            has_webp: None,
            has_light: None,
            has_dark: None,
            preview_url: "https://api.iconify.design/simple-icons/github.svg".to_string(),
            source: IconSource::IconifySimple,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("score").is_none());
        assert!(value.get("hasSvg").is_none());
        assert_eq!(value["previewUrl"], "https://api.iconify.design/simple-icons/github.svg");
        assert_eq!(value["source"], "iconify-simple");
    }
}
