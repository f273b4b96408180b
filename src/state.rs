use dashboard_backend::icons::IconService;
use std::sync::Arc;

pub struct AppState {
    /// Icon catalog service, shared by all request handlers / 图标服务
    pub icons: Arc<IconService>,
}
