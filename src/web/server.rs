//! Web服务器实现
//!
//! 基于axum的HTTP服务器，提供状态查询端点并支持优雅关闭

use super::{handlers, AppState};
use crate::config::ServerConfig;
use crate::error::{LokinetVitalsError, Result};
use crate::probe::HealthPoller;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Web服务器
pub struct WebServer {
    /// 服务器配置
    config: ServerConfig,
    /// 共享状态
    state: AppState,
}

impl WebServer {
    /// 创建新的Web服务器
    ///
    /// # 参数
    /// * `config` - 服务器配置
    /// * `poller` - 出口轮询器
    ///
    /// # 返回
    /// * `Self` - 服务器实例
    pub fn new(config: ServerConfig, poller: Arc<HealthPoller>) -> Self {
        Self {
            config,
            state: AppState::new(poller),
        }
    }

    /// 构建axum路由
    ///
    /// # 参数
    /// * `state` - 共享状态
    /// * `cors_enabled` - 是否启用CORS
    ///
    /// # 返回
    /// * `Router` - 路由实例
    pub fn build_router(state: AppState, cors_enabled: bool) -> Router {
        let mut router = Router::new()
            .route("/status", get(handlers::status))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        if cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// 启动服务器并阻塞直到收到关闭信号
    ///
    /// # 参数
    /// * `shutdown_rx` - 关闭信号接收器
    ///
    /// # 返回
    /// * `Result<()>` - 运行结果
    pub async fn start(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| LokinetVitalsError::Server(format!("无效的监听地址: {}", e)))?;

        let router = Self::build_router(self.state, self.config.cors_enabled);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| LokinetVitalsError::Server(format!("绑定地址{}失败: {}", addr, e)))?;

        log::info!("Web服务器启动: http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                log::info!("Web服务器收到关闭信号");
            })
            .await
            .map_err(|e| LokinetVitalsError::Server(format!("Web服务器运行失败: {}", e)))?;

        log::info!("Web服务器已停止");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PollPolicy;
    use crate::probe::{ProbeResult, StatusProbe};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// 固定返回同一结果的探测器
    struct StaticProbe(ProbeResult);

    #[async_trait::async_trait]
    impl StatusProbe for StaticProbe {
        async fn probe(&self) -> ProbeResult {
            self.0.clone()
        }
    }

    fn create_test_router(result: ProbeResult) -> Router {
        let policy = PollPolicy {
            max_attempts: 2,
            poll_interval_seconds: 0,
        };
        let poller = HealthPoller::new(Arc::new(StaticProbe(result)), policy);
        WebServer::build_router(AppState::new(Arc::new(poller)), false)
    }

    #[tokio::test]
    async fn test_router_status_available() {
        let router = create_test_router(ProbeResult::Healthy);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_status_unavailable() {
        let router = create_test_router(ProbeResult::Unhealthy);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_router_unknown_route() {
        let router = create_test_router(ProbeResult::Healthy);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_with_cors_enabled() {
        let policy = PollPolicy {
            max_attempts: 1,
            poll_interval_seconds: 0,
        };
        let poller = HealthPoller::new(Arc::new(StaticProbe(ProbeResult::Healthy)), policy);
        let router = WebServer::build_router(AppState::new(Arc::new(poller)), true);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
