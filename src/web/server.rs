//! Web server for openlms.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::auth::TokenService;
use crate::config::Config;
use crate::db::Database;
use crate::mail::Mailer;
use crate::Result;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Session token issuer/verifier.
    token_service: Arc<TokenService>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Arc<Database>, mailer: Arc<Mailer>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                crate::LmsError::Config(format!("invalid web server address: {e}"))
            })?;

        let token_service = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.token_expiry_secs,
        ));

        let app_state = Arc::new(AppState::new(
            db,
            token_service.clone(),
            mailer,
            config.server.frontend_url.clone(),
        ));

        Ok(Self {
            addr,
            app_state,
            token_service,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        create_router(
            self.app_state.clone(),
            self.token_service.clone(),
            &self.cors_origins,
        )
        .layer(CompressionLayer::new())
    }

    /// Run the web server until shutdown.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
