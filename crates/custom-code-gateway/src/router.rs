//! Gateway router - dispatches inbound API calls to custom code methods
//!
//! A call to `/{method}` is resolved by name against the method registry.
//! Query string parameters become the method's named parameters and the raw
//! body is passed through untouched.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use custom_code_sdk::HandlerError;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Create the gateway router that handles all incoming requests
pub fn create_gateway_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/methods", get(list_methods))
        .route("/{method}", any(invoke_method))
        .fallback(not_found)
}

/// Health check endpoint for the gateway
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Registration metadata for every method: name and declared parameters
async fn list_methods(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.methods.list())
}

async fn not_found() -> Response {
    error_response(HandlerError::MethodNotFound("no method in path".to_string()))
}

/// Resolve the call to a method and run it once
async fn invoke_method(
    State(state): State<Arc<AppState>>,
    Path(method_name): Path<String>,
    request: Request<Body>,
) -> Response {
    let verb = request.method().to_string();
    let request_id = Uuid::new_v4().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method_name,
        verb = %verb,
        "Incoming call"
    );

    let Some(method) = state.methods.get(&method_name).copied() else {
        tracing::debug!(request_id = %request_id, "No custom code method named {}", method_name);
        return error_response(HandlerError::MethodNotFound(method_name));
    };

    let params: HashMap<String, String> = request.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let headers = header_map(&request);

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.config.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to read body: {}", e);
            return error_response(HandlerError::BadRequest("Failed to read body".to_string()));
        }
    };

    let body = match String::from_utf8(body_bytes.to_vec()) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(request_id = %request_id, "Body is not valid UTF-8: {}", e);
            return error_response(HandlerError::BadRequest("Body is not valid UTF-8".to_string()));
        }
    };

    let sdk_request = custom_code_sdk::Request {
        method_name: method_name.clone(),
        verb,
        params,
        headers,
        body,
        request_id: request_id.clone(),
    };

    let missing = method.missing_params(&sdk_request);
    if !missing.is_empty() {
        tracing::debug!(request_id = %request_id, ?missing, "Declared parameters not supplied");
    }

    let future = tokio::task::spawn_blocking(move || method.execute(&sdk_request));

    match tokio::time::timeout(state.config.handler_timeout(), future).await {
        Ok(Ok(sdk_response)) => {
            tracing::debug!(request_id = %request_id, status = sdk_response.status, "Method completed");
            into_http_response(sdk_response)
        }
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, "Method task panicked: {}", e);
            error_response(HandlerError::Internal("Method task panicked".to_string()))
        }
        Err(_) => {
            tracing::error!(request_id = %request_id, "Method execution timed out");
            error_response(HandlerError::Internal("Method execution timed out".to_string()))
        }
    }
}

/// Copy request headers; values that are not visible ASCII are kept lossily.
fn header_map(request: &Request<Body>) -> HashMap<String, String> {
    request.headers()
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect()
}

fn error_response(err: HandlerError) -> Response {
    into_http_response(err.to_response())
}

/// Serialize an SDK response as a JSON HTTP response
fn into_http_response(sdk_response: custom_code_sdk::Response) -> Response {
    let body = match sdk_response.body_json() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to serialize response fields: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response();
        }
    };

    let Ok(status) = StatusCode::from_u16(sdk_response.status) else {
        tracing::error!(status = sdk_response.status, "Method returned an invalid status code");
        return error_response(HandlerError::Internal(format!(
            "Invalid status code: {}",
            sdk_response.status
        )));
    };

    let mut builder = Response::builder().status(status);

    for (key, value) in &sdk_response.headers {
        builder = builder.header(key, value);
    }

    if !sdk_response.headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
        builder = builder.header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    match builder.body(Body::from(body)) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}
