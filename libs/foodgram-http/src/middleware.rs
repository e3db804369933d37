//! Outer middleware stack shared by every route.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use foodgram_errors::Problem;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

use crate::{config::HttpConfig, cors::build_cors_layer};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[must_use]
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Generates a UUID v4 request id when the client did not send one.
#[derive(Clone, Copy, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Points the `instance` of problem responses at the request path.
///
/// Problems built away from the request (domain errors, extractor rejections)
/// carry an empty or `/` instance; explicit instances are left alone.
pub async fn problem_instance(req: axum::extract::Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let resp = next.run(req).await;

    let Some(problem) = resp.extensions().get::<Problem>() else {
        return resp;
    };
    if !(problem.instance.is_empty() || problem.instance == "/") {
        return resp;
    }

    let problem = problem.clone().with_instance(path);
    let (parts, _) = resp.into_parts();
    let mut rebuilt = problem.into_response();
    for (name, value) in &parts.headers {
        if name != header::CONTENT_LENGTH && name != header::CONTENT_TYPE {
            rebuilt.headers_mut().append(name.clone(), value.clone());
        }
    }
    rebuilt
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                },
            ),
    )
}

/// Apply all middleware layers to a router.
///
/// Requests flow outermost to innermost:
/// `SetRequestId` -> `PropagateRequestId` -> Trace -> Timeout -> `BodyLimit` -> CORS -> Router.
pub fn apply_middleware_stack(mut router: Router, cfg: &HttpConfig) -> Router {
    if let Some(cors) = &cfg.cors {
        router = router.layer(build_cors_layer(cors));
    }

    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        cfg.request_timeout,
    ));

    router = apply_trace_layer(router);

    let x_request_id = request_id_header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::{body::Body, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        apply_middleware_stack(router, &HttpConfig::default())
    }

    #[tokio::test]
    async fn request_id_is_generated() {
        let resp = app()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let rid = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(rid).is_ok());
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    async fn problem_body(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        use http_body_util::BodyExt;

        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn problem_instance_defaults_to_request_path() {
        use foodgram_errors::problems::not_found;

        async fn missing() -> Problem {
            not_found("Not found.").with_instance("/")
        }
        async fn moved() -> Problem {
            not_found("gone").with_instance("/elsewhere")
        }

        let router = Router::new()
            .route("/api/recipes/{id}/", get(missing))
            .route("/explicit", get(moved))
            .layer(axum::middleware::from_fn(problem_instance));

        let (status, body) = problem_body(router.clone(), "/api/recipes/7/?page=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["instance"], "/api/recipes/7/");
        assert_eq!(body["detail"], "Not found.");

        let (_, body) = problem_body(router, "/explicit").await;
        assert_eq!(body["instance"], "/elsewhere");
    }
}
