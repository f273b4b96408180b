use thiserror::Error;

/// Icon service error kinds / 图标服务错误类型
#[derive(Debug, Error)]
pub enum IconError {
    /// Reference missing from the catalog / 目录中不存在该图标
    #[error("Icon not found: {0}")]
    NotFound(String),
    /// Entry has neither SVG nor PNG / 没有可用格式
    #[error("Selected icon does not have a supported format.")]
    UnsupportedFormat,
    /// Malformed identifier or unsupported icon set / 非法图标标识
    #[error("{0}")]
    InvalidReference(String),
    /// Index or search endpoint unreachable or unparsable / 图标源不可用
    #[error("Icon search source unavailable: {0}")]
    SourceUnavailable(String),
    /// All candidates exhausted / 所有候选均失败
    #[error("Failed to fetch icon from source{}", detail_suffix(.0))]
    FetchFailed(Option<String>),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => ".".to_string(),
    }
}
