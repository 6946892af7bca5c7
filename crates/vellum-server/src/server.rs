use std::sync::Arc;

use tokio::net::TcpListener;
use vellum_index::JsonIndexResolver;
use vellum_store::LocalContentStore;

use crate::auth::{AllowAllAuth, AuthProvider, TokenTableAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::retrieval::Retriever;
use crate::router::{build_router, AppState};

/// Vellum object server backed by the JSON index and local store under
/// `data_root`.
pub struct VellumServer {
    config: ServerConfig,
}

impl VellumServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn retriever(&self) -> Retriever {
        Retriever::new(
            Arc::new(JsonIndexResolver::new(&self.config.data_root)),
            Arc::new(LocalContentStore::new(&self.config.data_root)),
            self.config.retrieval(),
        )
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        if self.config.allow_any_token {
            tracing::warn!("allow_any_token is set: every bearer token is accepted as a client id");
            Arc::new(AllowAllAuth)
        } else {
            Arc::new(TokenTableAuth::from_config(&self.config.tokens))
        }
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::new(self.retriever()), self.auth()))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            "Vellum server listening on {} (data root: {})",
            self.config.bind_addr,
            self.config.data_root.display()
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
