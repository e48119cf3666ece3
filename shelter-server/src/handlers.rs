use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};
use shelter_core::ApiError;
use shelter_graph::{execute, Document, RequestContext, Response, Services};

use crate::extract::CurrentCaller;

/// POST /graphql
///
/// Per-operation failures are reported inside the envelope with status 200;
/// only an unreadable document or a rejected token fails the request.
pub(crate) async fn graphql_handler(
    State(services): State<Arc<Services>>,
    CurrentCaller(caller): CurrentCaller,
    body: Bytes,
) -> Result<Json<Response>, ApiError> {
    let document: Document = serde_json::from_slice(&body)
        .map_err(|err| ApiError::bad_input("body", format!("Malformed document: {err}")))?;
    let ctx = RequestContext::new(services, caller);
    Ok(Json(execute(&ctx, &document).await))
}

/// GET /health
pub(crate) async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
