//! Remote catalog client / 远程图标目录客户端
//!
//! Stateless outbound HTTP: index documents, search APIs and icon assets.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "kiss-this-dashboard/1.1 (+selfhst-icons)";
const ACCEPT: &str = "application/json, image/svg+xml, image/png;q=0.9, */*;q=0.8";

/// Outbound request failure / 远程请求失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Remote answered 404 / 远端返回 404
    #[error("remote returned 404")]
    NotFound,
    /// Any other non-success status / 其它非成功状态码
    #[error("Icon source error ({0}).")]
    Status(u16),
    /// Connect, timeout or body read failure / 连接、超时或读取失败
    #[error("{0}")]
    Transport(String),
}

/// Body plus the media type the remote declared / 响应体及其声明的类型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl RemoteResponse {
    /// Media type without parameters, lowercased; `None` when absent or blank / 去掉参数的类型
    pub fn media_type(&self) -> Option<String> {
        let raw = self.content_type.as_deref()?;
        let media = raw.split(';').next().unwrap_or("").trim().to_lowercase();
        if media.is_empty() {
            None
        } else {
            Some(media)
        }
    }
}

/// Blocking-point abstraction over the network / 网络访问抽象
#[async_trait]
pub trait IconFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError>;
}

/// reqwest-backed fetcher / 基于 reqwest 的实现
pub struct HttpIconFetcher {
    client: Client,
}

impl HttpIconFetcher {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IconFetcher for HttpIconFetcher {
    async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(RemoteResponse {
            body: body.to_vec(),
            content_type,
        })
    }
}

/// Percent-encode one path or query component (unreserved characters kept) / 编码单个 URL 片段
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
