//! HTTP endpoints for the UDF server.
//!
//! The query engine drives three endpoints: a health probe, a listing of
//! the registered functions, and the invocation endpoint itself. Invocation
//! is request/response JSON; the registry owns dispatch and the functions
//! own argument validation.
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Unknown
//! function names return 404; invocation failures (arity, argument type,
//! payload decode) return 400. There are no partial results: a call either
//! returns the function's value or an error.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::registry::{UdfError, UdfRegistry};

/// Create the API router.
pub fn router() -> Router<Arc<UdfRegistry>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/functions", get(list_functions))
        .route("/api/functions/{name}", post(invoke_function))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Registered function listing.
#[derive(Debug, Serialize)]
pub struct FunctionListResponse {
    pub functions: Vec<&'static str>,
}

/// List the registered functions.
async fn list_functions(State(registry): State<Arc<UdfRegistry>>) -> Json<FunctionListResponse> {
    Json(FunctionListResponse {
        functions: registry.names(),
    })
}

/// One invocation request: the argument row for the function.
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    #[serde(default)]
    pub args: Vec<Value>,
}

/// One invocation result.
#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub result: Value,
}

/// Invoke a registered function on one argument row.
///
/// # Errors
///
/// - [`AppError::NotFound`] when no function is registered under `name`.
/// - [`AppError::Udf`] (HTTP 400) when the function rejects the arguments
///   or the payload fails to decode.
async fn invoke_function(
    State(registry): State<Arc<UdfRegistry>>,
    Path(name): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, AppError> {
    let udf = registry
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("No function registered as '{}'", name)))?;

    let result = udf.invoke(&request.args)?;

    Ok(Json(InvokeResponse { result }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Udf(UdfError),
}

impl From<UdfError> for AppError {
    fn from(e: UdfError) -> Self {
        AppError::Udf(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Udf(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::registry::PayloadDecoder;

    fn create_test_registry() -> Arc<UdfRegistry> {
        let mut registry = UdfRegistry::new();
        registry.register(Arc::new(PayloadDecoder));
        Arc::new(registry)
    }

    async fn response_body(response: axum::response::Response) -> String {
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn invoke_request(name: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/functions/{}", name))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_list_functions() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/functions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["functions"], serde_json::json!(["ttn_payload_decoder"]));
    }

    #[tokio::test]
    async fn test_invoke_decoder() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({"args": ["AQACAA=="]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["result"]["wifi_count"], 1);
        assert_eq!(json["result"]["ble_count"], 2);
    }

    #[tokio::test]
    async fn test_invoke_decoder_max_wifi() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({"args": ["//8AAA=="]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["result"]["wifi_count"], 65535);
        assert_eq!(json["result"]["ble_count"], 0);
    }

    #[tokio::test]
    async fn test_invoke_unknown_function() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "no_such_function",
                serde_json::json!({"args": ["AQACAA=="]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("no_such_function"));
    }

    #[tokio::test]
    async fn test_invoke_invalid_base64() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({"args": ["not base64!!!"]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("base64"));
    }

    #[tokio::test]
    async fn test_invoke_truncated_payload() {
        let app = router().with_state(create_test_registry());

        // "AQA=" decodes to 2 bytes
        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({"args": ["AQA="]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("truncated"));
    }

    #[tokio::test]
    async fn test_invoke_missing_args() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("expected 1"));
    }

    #[tokio::test]
    async fn test_invoke_non_string_argument() {
        let app = router().with_state(create_test_registry());

        let response = app
            .oneshot(invoke_request(
                "ttn_payload_decoder",
                serde_json::json!({"args": [7]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
