//! Application assembly and lifecycle.
//!
//! [`Application::build`] wires store, cache, caching repository, service and
//! router together and binds the listener. [`Application::run_until_stopped`]
//! serves until SIGINT/SIGTERM, then drains in-flight requests for at most the
//! configured grace period.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, CachedUserRepository, Database, MemoryCache, RedisCache, UserStore};
use crate::services::UserManager;

/// A fully wired, bound, not yet serving application.
pub struct Application {
    listener: TcpListener,
    router: Router,
    shutdown_grace: Duration,
}

impl Application {
    /// Connect dependencies and bind the listening socket.
    pub async fn build(config: Config) -> AppResult<Self> {
        let database = Arc::new(Database::connect(&config.database).await?);
        tracing::info!("Database connected");

        let cache = connect_cache(&config).await?;

        let store = Arc::new(UserStore::new(database.get_connection()));
        let repository = Arc::new(CachedUserRepository::new(store, cache.clone()));
        let user_service = Arc::new(UserManager::new(repository));

        let router = create_router(AppState::new(user_service, cache, database));

        let addr = config.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            router,
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| AppError::internal(format!("Failed to read local address: {}", e)))
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> AppResult<()> {
        self.run_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain for the grace period.
    ///
    /// Requests still running when the grace period ends are abandoned.
    pub async fn run_with_shutdown<F>(self, signal: F) -> AppResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!("Server running on http://{}", addr);
        }

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = axum::serve(self.listener, self.router).with_graceful_shutdown(async move {
            let _ = stop_rx.await;
        });
        let mut handle = tokio::spawn(async move { server.await });

        tokio::select! {
            result = &mut handle => return server_result(result),
            _ = signal => {}
        }

        tracing::info!(grace = ?self.shutdown_grace, "Shutting down, draining in-flight requests");
        let _ = stop_tx.send(());

        match tokio::time::timeout(self.shutdown_grace, &mut handle).await {
            Ok(result) => {
                server_result(result)?;
                tracing::info!("Server shutdown complete");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(grace = ?self.shutdown_grace, "Grace period elapsed, abandoning in-flight requests");
                handle.abort();
                Ok(())
            }
        }
    }
}

/// Redis when configured, otherwise the in-process cache.
async fn connect_cache(config: &Config) -> AppResult<Arc<dyn Cache>> {
    match &config.redis_url {
        Some(url) => Ok(Arc::new(RedisCache::connect(url, config.cache_ttl).await?)),
        None => {
            tracing::info!("REDIS_URL not set, using in-process cache");
            Ok(Arc::new(MemoryCache::new(config.cache_ttl)))
        }
    }
}

fn server_result(result: Result<std::io::Result<()>, JoinError>) -> AppResult<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {}", e))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {}", e))),
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            shutdown_grace: Duration::from_millis(500),
            ..Config::default()
        }
    }

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_signalled() {
        let app = Application::build(test_config()).await.unwrap();
        let addr = app.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(app.run_with_shutdown(async move {
            let _ = rx.await;
        }));

        let response = raw_get(addr, "/users").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("[]"));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_stops_accepting_after_shutdown() {
        let app = Application::build(test_config()).await.unwrap();
        let addr = app.local_addr().unwrap();

        app.run_with_shutdown(async {}).await.unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }
}
