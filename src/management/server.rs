//! # 管理服务器
//!
//! Axum HTTP服务器，承载触发接口和状态查询接口

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::app::context::AppContext;
use crate::error::{MonitorError, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::management::handlers::system;

/// 管理服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    /// 包装共享上下文
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 创建完整的路由器：`/api` 下的业务路由加 `/ping`
pub fn create_router(context: Arc<AppContext>) -> Router {
    let state = AppState::new(context);
    Router::new()
        .nest("/api", super::routes::create_routes(state))
        .route("/ping", get(system::ping_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// 管理服务器
pub struct ManagementServer {
    addr: SocketAddr,
    router: Router,
}

impl ManagementServer {
    /// 创建新的管理服务器
    pub fn new(context: Arc<AppContext>) -> Result<Self> {
        let bind_address = context.config.server.bind_address();
        let addr = bind_address.parse::<SocketAddr>().map_err(|e| {
            MonitorError::config_with_source(
                format!("Invalid server bind address '{bind_address}'"),
                e,
            )
        })?;

        Ok(Self {
            addr,
            router: create_router(context),
        })
    }

    /// 绑定地址
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        self.addr
    }

    /// 启动服务器，直到 `shutdown` 被取消
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("管理服务器启动: {}", self.addr)
        );

        let listener = TcpListener::bind(self.addr).await?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| MonitorError::network_with_source("Management server error", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "管理服务器已关闭"
        );
        Ok(())
    }
}
