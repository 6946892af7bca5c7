use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde_json::json;
use vellum_types::ClientId;

use crate::retrieval::{
    ObjectBody, Retrieval, RetrievalRequest, OBJECT_DATE_HEADER, OBJECT_TITLE_HEADER,
};
use crate::router::AppState;

/// Stored objects are sent as raw bytes; only the built-in sample is typed.
const SAMPLE_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "vellum-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /object/{objectId}`.
pub async fn object_handler(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
    client: Option<Extension<ClientId>>,
) -> Response {
    retrieve(state, object_id, client).await
}

/// `GET /object/`: the router never binds an empty path parameter, so the
/// empty identifier gets its own route.
pub async fn empty_object_handler(
    State(state): State<AppState>,
    client: Option<Extension<ClientId>>,
) -> Response {
    retrieve(state, String::new(), client).await
}

async fn retrieve(state: AppState, object_id: String, client: Option<Extension<ClientId>>) -> Response {
    let request = RetrievalRequest::new(object_id, client.map(|Extension(c)| c));
    match state.retriever.retrieve(request).await {
        Ok(retrieval) => retrieval.into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for Retrieval {
    fn into_response(self) -> Response {
        let (body, content_type) = match self.body {
            ObjectBody::Sample(text) => (Body::from(text), Some(SAMPLE_CONTENT_TYPE)),
            ObjectBody::Stream(stream) => (Body::from_stream(stream), None),
        };
        let mut response = Response::new(body);
        let headers = response.headers_mut();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers.insert(HeaderName::from_static(OBJECT_DATE_HEADER), self.headers.date().clone());
        headers.insert(HeaderName::from_static(OBJECT_TITLE_HEADER), self.headers.title().clone());
        response
    }
}
