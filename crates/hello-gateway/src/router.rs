//! Gateway router - resolves request paths to handlers and invokes them
//!
//! Handlers run on the blocking pool under the configured timeout; their
//! returned string becomes the response body, sent with the content type the
//! route was registered with. Handler errors carry their own status.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use hello_gateway_sdk::{Attributes, Context, Message, RequestId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::GatewayError;
use crate::routes::RouteHandler;
use crate::AppState;

/// Create the gateway router that handles all incoming requests
pub fn create_gateway_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/{*path}", any(handle_gateway_request))
        .route("/", any(handle_gateway_request))
}

/// Health check endpoint for the gateway
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Handle an incoming gateway request using the route table
async fn handle_gateway_request(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let request_id = RequestId::new();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let (route, path_params) = state.routes.resolve(&path).ok_or_else(|| {
        tracing::debug!("No route found for {} {}", method, path);
        GatewayError::RouteNotFound
    })?;

    let query_params: HashMap<String, String> = request
        .uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let attributes = Attributes {
        method,
        request_uri: request.uri().to_string(),
        path_params,
        query_params,
        headers,
    };

    let body_bytes = axum::body::to_bytes(request.into_body(), state.config.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, "Failed to read body: {}", e);
            GatewayError::BodyRead(e.to_string())
        })?;

    let mut message = Message::new(attributes);
    if !body_bytes.is_empty() {
        message.payload = Some(String::from_utf8_lossy(&body_bytes).into_owned());
    }

    let ctx = Context::with_request_id(route.handler_name.as_str(), request_id);
    let timeout = Duration::from_secs(state.config.handler_timeout_secs);
    let body = execute_with_timeout(route.handler, ctx, message, timeout).await?;

    Ok(([(header::CONTENT_TYPE, route.content_type)], body).into_response())
}

/// Run a handler on the blocking pool, failing if it outlives `timeout`
pub async fn execute_with_timeout(
    handler: RouteHandler,
    ctx: Context,
    message: Message,
    timeout: Duration,
) -> Result<String, GatewayError> {
    let request_id = ctx.request_id.clone();
    let handler_name = ctx.handler.clone();

    let task = tokio::task::spawn_blocking(move || handler.call(&ctx, &message));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(body))) => {
            tracing::debug!(request_id = %request_id, handler = %handler_name, "Handler completed");
            Ok(body)
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!(request_id = %request_id, handler = %handler_name, "Handler rejected request: {}", e);
            Err(e.into())
        }
        Ok(Err(e)) => {
            tracing::error!(request_id = %request_id, handler = %handler_name, "Handler task panicked: {}", e);
            Err(GatewayError::HandlerPanicked(e.to_string()))
        }
        Err(_) => {
            tracing::error!(request_id = %request_id, handler = %handler_name, "Handler execution timed out");
            Err(GatewayError::HandlerTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::routes::TEXT_PLAIN;
    use hello_gateway_sdk::HandlerError;
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        create_gateway_router().with_state(Arc::new(state))
    }

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_text(router: Router, uri: &str, body: &'static str) -> (StatusCode, String, String) {
        let response = router
            .oneshot(Request::builder().method("POST").uri(uri).body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn conflict(_ctx: &Context, _message: &Message) -> Result<String, HandlerError> {
        Err(HandlerError::Internal("state conflict".into()))
    }

    fn echo_attributes(ctx: &Context, message: &Message) -> String {
        let attributes = message.attributes();
        format!(
            "{} {} q={} payload={} handler={}",
            attributes.method,
            attributes.request_uri,
            attributes.query_param("q").map(String::as_str).unwrap_or("-"),
            message.payload.as_deref().unwrap_or("-"),
            ctx.handler,
        )
    }

    fn slow(_ctx: &Context, _message: &Message) -> String {
        std::thread::sleep(Duration::from_millis(500));
        "late".to_string()
    }

    fn panics(_ctx: &Context, _message: &Message) -> String {
        panic!("handler failure")
    }

    #[tokio::test]
    async fn test_hello_without_name() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn test_hello_with_name() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/hello/Alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World Alice");
    }

    #[tokio::test]
    async fn test_hello_with_empty_name_segment() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/hello/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World ");
    }

    #[tokio::test]
    async fn test_hello_name_is_percent_decoded() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/hello/John%20Smith").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World John Smith");
    }

    #[tokio::test]
    async fn test_configured_hello_routes_replace_defaults() {
        let config = AppConfig::from_lookup(|key| {
            (key == "HELLO_GATEWAY_HELLO_ROUTES").then(|| "/greet,/greet/{name}".to_string())
        });
        let router = app(AppState::new(config));

        let (status, body) = get_text(router.clone(), "/greet/Ann").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World Ann");

        let (status, body) = get_text(router.clone(), "/greet").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");

        let (status, _) = get_text(router, "/hello").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_csv_read_route_answers_with_json() {
        let (status, content_type, body) = post_text(
            app(AppState::new(AppConfig::default())),
            "/csv/read?firstRecordAsHeader=true",
            "Player Name,Position\r\nVic Crumb,Shortstop\r\n",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"[{"Player Name":"Vic Crumb","Position":"Shortstop"}]"#);
    }

    #[tokio::test]
    async fn test_csv_write_route_answers_with_csv() {
        let (status, content_type, body) = post_text(
            app(AppState::new(AppConfig::default())),
            "/csv/write?includeHeaders=true&headers=Header%201,Header%203",
            r#"[{"Header 1":"one","Header 2":"two","Header 3":"three"},["four","six"]]"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/csv; charset=utf-8");
        assert_eq!(body, "Header 1,Header 3\r\none,three\r\nfour,six\r\n");
    }

    #[tokio::test]
    async fn test_csv_routes_reject_bad_settings() {
        let (status, _, body) = post_text(
            app(AppState::new(AppConfig::default())),
            "/csv/read?delimiter=%3A%3A",
            "a::b",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Bad request: Configuration error: Delimiter must be a single char");

        let (status, _, body) = post_text(
            app(AppState::new(AppConfig::default())),
            "/csv/write",
            r#"{"not":"a list"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.ends_with("The payload must contain a list, but type=[object] was given."));
    }

    #[tokio::test]
    async fn test_handler_error_status_reaches_client() {
        let mut state = AppState::new(AppConfig::default());
        state.routes.register_fallible("/conflict", "conflict", conflict, TEXT_PLAIN);

        let (status, body) = get_text(app(state), "/conflict").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error: state conflict");
    }

    #[tokio::test]
    async fn test_response_is_plain_text() {
        let response = app(AppState::new(AppConfig::default()))
            .oneshot(Request::builder().uri("/hello/Bob").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/goodbye").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_text(app(AppState::new(AppConfig::default())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_message_carries_request_metadata() {
        let mut state = AppState::new(AppConfig::default());
        state.routes.register("/echo", "echo", echo_attributes);

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo?q=rust%20lang")
                    .body(Body::from("ping"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            "POST /echo?q=rust%20lang q=rust lang payload=ping handler=echo"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let config = AppConfig {
            max_body_bytes: 4,
            ..AppConfig::default()
        };
        let response = app(AppState::new(config))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hello")
                    .body(Body::from("far too long"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let result = execute_with_timeout(
            RouteHandler::Plain(slow),
            Context::new("slow"),
            Message::default(),
            Duration::from_millis(10),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::HandlerTimeout)));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_reported() {
        let result = execute_with_timeout(
            RouteHandler::Plain(panics),
            Context::new("panics"),
            Message::default(),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::HandlerPanicked(_))));
    }
}
