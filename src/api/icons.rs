//! Icon search and import endpoints / 图标搜索与导入接口

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use dashboard_backend::icons::{IconError, IconSource, MIN_QUERY_CHARS};

use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Map a core error kind onto a status code / 错误类型映射到状态码
fn icon_error(e: IconError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        IconError::InvalidReference(_) | IconError::UnsupportedFormat => StatusCode::BAD_REQUEST,
        IconError::NotFound(_) => StatusCode::NOT_FOUND,
        IconError::SourceUnavailable(_) | IconError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
    };
    if status == StatusCode::BAD_GATEWAY {
        tracing::warn!("Icon upstream failure: {}", e);
    }
    (
        status,
        Json(json!({ "code": status.as_u16(), "message": e.to_string() })),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<String>,
    pub source: Option<String>,
}

/// GET /api/icons/search - 搜索图标
pub async fn search_icons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult {
    let query = params.q.trim();
    let source = IconSource::parse(params.source.as_deref().unwrap_or(""));
    let limit = params
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIMIT);

    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Json(json!({
            "items": [],
            "query": query,
            "message": "Enter at least 2 characters.",
        })));
    }

    let items = state
        .icons
        .search(query, limit, source)
        .await
        .map_err(icon_error)?;

    Ok(Json(json!({
        "query": query,
        "items": items,
        "source": source,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ImportSelfhstRequest {
    #[serde(default)]
    pub reference: String,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportIconifyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "svg".to_string()
}

fn import_response(icon: dashboard_backend::icons::ImportedIcon) -> ApiResult {
    let mut body = serde_json::to_value(&icon).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": 500, "message": e.to_string() })),
        )
    })?;
    if let Some(obj) = body.as_object_mut() {
        obj.insert("ok".to_string(), Value::Bool(true));
    }
    Ok(Json(body))
}

/// POST /api/icons/import-selfhst - 导入目录图标
pub async fn import_selfhst(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportSelfhstRequest>,
) -> ApiResult {
    let icon = state
        .icons
        .import_catalog(&req.reference, &req.format)
        .await
        .map_err(icon_error)?;
    tracing::info!("Imported catalog icon {} ({})", icon.reference, icon.format.ext());
    import_response(icon)
}

/// POST /api/icons/import-iconify - 导入 Iconify 图标
pub async fn import_iconify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportIconifyRequest>,
) -> ApiResult {
    let icon = state
        .icons
        .import_federated(&req.name, &req.format, &req.source)
        .await
        .map_err(icon_error)?;
    tracing::info!("Imported {} icon {}", icon.source, icon.reference);
    import_response(icon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use dashboard_backend::config::IconConfig;
    use dashboard_backend::icons::{
        FetchError, IconFetcher, IconService, RemoteResponse, SystemClock,
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct StaticFetcher(HashMap<String, Vec<u8>>);

    #[async_trait]
    impl IconFetcher for StaticFetcher {
        async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError> {
            self.0
                .get(url)
                .map(|body| RemoteResponse {
                    body: body.clone(),
                    content_type: None,
                })
                .ok_or(FetchError::NotFound)
        }
    }

    fn app(routes: &[(&str, &[u8])]) -> axum::Router {
        let config = IconConfig {
            index_url: "https://catalog.test/index.json".to_string(),
            raw_base: "https://raw.test".to_string(),
            iconify_api_base: "https://iconify.test".to_string(),
            ..IconConfig::default()
        };
        let fetcher = StaticFetcher(
            routes
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_vec()))
                .collect(),
        );
        let icons = IconService::new(&config, Arc::new(fetcher), Arc::new(SystemClock));
        crate::api::routes(Arc::new(AppState {
            icons: Arc::new(icons),
        }))
    }

    async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const INDEX: &[u8] = br#"[{"Name": "Radarr", "Reference": "radarr", "SVG": "Yes"}]"#;
    const SVG: &[u8] = b"<svg/>";

    #[tokio::test]
    async fn test_short_query_message() {
        let req = Request::get("/api/icons/search?q=r").body(Body::empty()).unwrap();
        let (status, body) = call(app(&[]), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["message"], "Enter at least 2 characters.");
    }

    #[tokio::test]
    async fn test_shortest_accepted_query_is_searched() {
        let app = app(&[("https://catalog.test/index.json", INDEX)]);
        let query = "ra";
        assert_eq!(query.chars().count(), MIN_QUERY_CHARS);
        let req = Request::get(format!("/api/icons/search?q={}", query))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("message").is_none());
        assert_eq!(body["items"][0]["reference"], "radarr");
    }

    #[tokio::test]
    async fn test_search_catalog() {
        let app = app(&[("https://catalog.test/index.json", INDEX)]);
        let req = Request::get("/api/icons/search?q=radar&limit=abc&source=bogus")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "selfhst");
        assert_eq!(body["items"][0]["reference"], "radarr");
        assert_eq!(body["items"][0]["hasSvg"], true);
        assert_eq!(body["items"][0]["source"], "selfhst");
    }

    #[tokio::test]
    async fn test_search_unavailable_is_bad_gateway() {
        let req = Request::get("/api/icons/search?q=radar").body(Body::empty()).unwrap();
        let (status, body) = call(app(&[]), req).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], 502);
    }

    #[tokio::test]
    async fn test_import_selfhst() {
        let app = app(&[
            ("https://catalog.test/index.json", INDEX),
            ("https://raw.test/svg/radarr.svg", SVG),
        ]);
        let req = post_json("/api/icons/import-selfhst", json!({"reference": "radarr"}));
        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["source"], "selfhst");
        assert_eq!(body["icon"], "radarr.svg");
        assert_eq!(body["format"], "svg");
        assert_eq!(body["contentType"], "image/svg+xml");
        assert_eq!(body["iconData"], "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[tokio::test]
    async fn test_import_status_codes() {
        let routes = [("https://catalog.test/index.json", INDEX)];

        let req = post_json("/api/icons/import-selfhst", json!({"reference": "../x"}));
        let (status, _) = call(app(&routes), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = post_json("/api/icons/import-selfhst", json!({"reference": "lidarr"}));
        let (status, _) = call(app(&routes), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = post_json("/api/icons/import-iconify", json!({"name": "not a valid id"}));
        let (status, body) = call(app(&routes), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid icon name.");

        let req = post_json(
            "/api/icons/import-iconify",
            json!({"name": "github", "source": "iconify-simple", "format": "png"}),
        );
        let (status, _) = call(app(&routes), req).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
