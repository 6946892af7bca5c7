use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use vellum_types::ClientId;

use crate::error::ServerResult;
use crate::router::AppState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read `Authorization: Bearer <token>`; anything else is anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Resolves request credentials to the client they belong to.
///
/// `Ok(None)` leaves the request anonymous; the retrieval flow decides what
/// an anonymous caller may see.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Option<ClientId>>;
}

/// Uses the bearer token itself as the client id.
pub struct AllowAllAuth;

#[async_trait]
impl AuthProvider for AllowAllAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Option<ClientId>> {
        match credentials {
            Credentials::Bearer(token) => Ok(Some(ClientId::new(token.as_str()))),
            Credentials::Anonymous => Ok(None),
        }
    }
}

/// Fixed table of bearer tokens.
#[derive(Default)]
pub struct TokenTableAuth {
    tokens: HashMap<String, ClientId>,
}

impl TokenTableAuth {
    pub fn new(tokens: HashMap<String, ClientId>) -> Self {
        Self { tokens }
    }

    pub fn from_config(tokens: &HashMap<String, String>) -> Self {
        Self::new(
            tokens
                .iter()
                .map(|(token, client)| (token.clone(), ClientId::new(client.as_str())))
                .collect(),
        )
    }
}

#[async_trait]
impl AuthProvider for TokenTableAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Option<ClientId>> {
        match credentials {
            Credentials::Bearer(token) => Ok(self.tokens.get(token).cloned()),
            Credentials::Anonymous => Ok(None),
        }
    }
}

/// Middleware storing the caller's [`ClientId`] in the request extensions.
pub async fn resolve_client(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let credentials = Credentials::from_headers(req.headers());
    match state.auth.authenticate(&credentials).await {
        Ok(Some(client)) => {
            req.extensions_mut().insert(client);
        }
        Ok(None) => {
            if let Credentials::Bearer(_) = credentials {
                tracing::debug!("bearer token did not resolve to a client");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "authentication provider failed");
            return e.into_response();
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn credentials_from_headers() {
        assert_eq!(
            Credentials::from_headers(&headers_with("Bearer abc")),
            Credentials::Bearer("abc".into())
        );
        assert_eq!(Credentials::from_headers(&HeaderMap::new()), Credentials::Anonymous);
        assert_eq!(
            Credentials::from_headers(&headers_with("Basic Zm9vOmJhcg==")),
            Credentials::Anonymous
        );
        assert_eq!(Credentials::from_headers(&headers_with("Bearer ")), Credentials::Anonymous);
    }

    #[tokio::test]
    async fn allow_all_uses_token_as_client() {
        let auth = AllowAllAuth;
        let client = auth
            .authenticate(&Credentials::Bearer("acme".into()))
            .await
            .unwrap();
        assert_eq!(client, Some(ClientId::new("acme")));
        assert_eq!(auth.authenticate(&Credentials::Anonymous).await.unwrap(), None);
    }

    #[tokio::test]
    async fn token_table_lookup() {
        let mut tokens = HashMap::new();
        tokens.insert("s3cret".to_string(), "acme".to_string());
        let auth = TokenTableAuth::from_config(&tokens);

        let known = auth
            .authenticate(&Credentials::Bearer("s3cret".into()))
            .await
            .unwrap();
        assert_eq!(known, Some(ClientId::new("acme")));

        let unknown = auth
            .authenticate(&Credentials::Bearer("guess".into()))
            .await
            .unwrap();
        assert_eq!(unknown, None);
    }
}
