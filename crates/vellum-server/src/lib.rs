//! HTTP server for Vellum.
//!
//! Serves `GET /object/{objectId}`: resolves the caller's index entry for the
//! object, sends its title and date as `x-object-title` / `x-object-date`,
//! and streams the body from the content store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod retrieval;
pub mod router;
pub mod server;
pub mod sink;

#[cfg(test)]
mod testing;

pub use auth::{AllowAllAuth, AuthProvider, Credentials, TokenTableAuth};
pub use config::{RetrievalConfig, ServerConfig};
pub use error::{ErrorBody, RetrievalError, ServerError, ServerResult};
pub use retrieval::{
    ObjectBody, ObjectHeaders, Retrieval, RetrievalRequest, Retriever, OBJECT_DATE_HEADER,
    OBJECT_TITLE_HEADER, SAMPLE_OBJECT_BODY, SAMPLE_OBJECT_TITLE,
};
pub use router::{build_router, AppState};
pub use server::VellumServer;
pub use sink::ContentStream;
