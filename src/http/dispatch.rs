//! Per-request dispatch.
//!
//! # Flow
//! ```text
//! http::Request<B>
//!     → Request::from_parts (method, absolute URL, headers)
//!     → Router::find (first method + shape match on the raw target path)
//!         no match → 404 {"error": "RESOURCE_NOT_FOUND"}
//!     → collect body → content::decode
//!     → Handler::respond(Context)
//!     → Response::into_http
//! ```
//!
//! Any failure after normalization ends the request with `Err`. The
//! transport closes the connection without writing a response.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body as HttpBody;

use crate::error::{BoxError, Error};
use crate::http::content;
use crate::http::request::{Request, X_REQUEST_ID};
use crate::http::response::Response;
use crate::observability::metrics;
use crate::routing::handler::Context;
use crate::routing::router::Router;

/// Matches requests against a frozen [`Router`] and runs the handler.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Answer one request, or fail leaving it unanswered.
    pub async fn dispatch<B>(&self, req: http::Request<B>) -> Result<http::Response<Full<Bytes>>, Error>
    where
        B: HttpBody + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let started = Instant::now();
        let method = req.method().as_str().to_owned();
        let path = req.uri().path().to_owned();
        let request_id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_owned();

        match self.respond(req).await {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = response.status().as_u16(),
                    "Request answered"
                );
                metrics::record_request(&method, response.status().as_u16(), started);
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    kind = e.kind(),
                    error = %e,
                    "Request dropped without response"
                );
                metrics::record_dropped(&method, e.kind(), started);
                Err(e)
            }
        }
    }

    async fn respond<B>(&self, req: http::Request<B>) -> Result<http::Response<Full<Bytes>>, Error>
    where
        B: HttpBody + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let mut request = Request::from_parts(&parts)?;

        // Match on the target exactly as sent; the resolved URL has dot segments removed.
        let path = parts.uri.path();
        let Some(matched) = self.router.find(parts.method.as_str(), path) else {
            tracing::debug!(method = %parts.method, path = %path, "No route matched");
            return Response::not_found().into_http();
        };
        tracing::debug!(route = %matched.pattern, path = %path, "Route matched");
        let handler = Arc::clone(matched.handler);
        let params = matched.params;

        let bytes = body
            .collect()
            .await
            .map_err(|e| Error::Body(e.into()))?
            .to_bytes();
        let decoded = content::decode(&String::from_utf8_lossy(&bytes), request.content_type())?;
        request.set_body(decoded);

        let response = handler
            .respond(Context { req: request, params })
            .await
            .map_err(Error::Handler)?;
        response.into_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::future::BoxFuture;
    use serde_json::{json, Value};

    use crate::http::content::Body;
    use crate::routing::handler::{Handler, HandlerResult, Route};
    use crate::routing::method::Method;

    struct Counting {
        route: &'static str,
        hits: Arc<AtomicUsize>,
    }

    impl Handler for Counting {
        fn method(&self) -> Method {
            Method::Post
        }

        fn route(&self) -> &str {
            self.route
        }

        fn respond(&self, _ctx: Context) -> BoxFuture<'static, HandlerResult> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Response::new(204, "")) })
        }
    }

    fn request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> http::Request<Full<Bytes>> {
        let mut builder = http::Request::builder().method(method).uri(uri).header("host", "localhost");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Full::new(Bytes::from(body.to_owned()))).unwrap()
    }

    async fn body_json(res: http::Response<Full<Bytes>>) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn echo_router() -> Dispatcher {
        let mut router = Router::default();
        router
            .register(Route::get("/users/:id", |ctx: Context| async move {
                Ok(Response::new(200, json!({ "id": ctx.param("id") })))
            }))
            .register(Route::post("/forms", |ctx: Context| async move {
                let form = ctx.req.body().as_form().cloned().unwrap_or_default();
                Response::json(200, &form).map_err(BoxError::from)
            }))
            .register(Route::put("/fail", |_ctx: Context| async {
                Err::<Response, BoxError>("handler exploded".into())
            }))
            .register(Route::delete("/teapot", |_ctx: Context| async {
                Ok(Response::new(1000, ""))
            }));
        Dispatcher::new(Arc::new(router))
    }

    #[tokio::test]
    async fn unmatched_request_gets_default_404() {
        let dispatcher = echo_router();
        let res = dispatcher.dispatch(request("GET", "/a/b/c", None, "")).await.unwrap();
        assert_eq!(res.status(), 404);
        assert!(res.headers().is_empty());
        assert_eq!(body_json(res).await, json!({"error": "RESOURCE_NOT_FOUND"}));
    }

    #[tokio::test]
    async fn params_reach_the_handler() {
        let dispatcher = echo_router();
        let res = dispatcher.dispatch(request("GET", "/users/42", None, "")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(body_json(res).await, json!({"id": "42"}));
    }

    #[tokio::test]
    async fn segment_count_match_ignores_literals() {
        let dispatcher = echo_router();
        let res = dispatcher.dispatch(request("GET", "/orders/7", None, "")).await.unwrap();
        assert_eq!(body_json(res).await, json!({"id": "7"}));
    }

    #[tokio::test]
    async fn dot_segments_count_as_sent() {
        let mut router = Router::default();
        router.register(Route::get("/a/:x/:y", |ctx: Context| async move {
            Ok(Response::new(200, json!({ "x": ctx.param("x"), "y": ctx.param("y") })))
        }));
        let dispatcher = Dispatcher::new(Arc::new(router));

        let res = dispatcher.dispatch(request("GET", "/a/./b", None, "")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(body_json(res).await, json!({"x": ".", "y": "b"}));
    }

    #[tokio::test]
    async fn query_string_is_not_a_segment() {
        let dispatcher = echo_router();
        let res = dispatcher.dispatch(request("GET", "/users/5?next=/x/y", None, "")).await.unwrap();
        assert_eq!(body_json(res).await, json!({"id": "5"}));
    }

    #[tokio::test]
    async fn form_body_is_decoded() {
        let dispatcher = echo_router();
        let req = request("POST", "/forms", Some("x-www-form-urlencoded"), "name=bob&age=5");
        let res = dispatcher.dispatch(req).await.unwrap();
        assert_eq!(body_json(res).await, json!({"name": "bob", "age": "5"}));
    }

    #[tokio::test]
    async fn malformed_json_is_dropped_before_the_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::default();
        router.register(Counting { route: "/items", hits: Arc::clone(&hits) });
        let dispatcher = Dispatcher::new(Arc::new(router));

        let req = request("POST", "/items", Some("application/json"), "{\"broken\": ");
        let err = dispatcher.dispatch(req).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_failure_is_an_error() {
        let dispatcher = echo_router();
        let err = dispatcher.dispatch(request("PUT", "/fail", None, "")).await.unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[tokio::test]
    async fn unrepresentable_response_is_an_error() {
        let dispatcher = echo_router();
        let err = dispatcher.dispatch(request("DELETE", "/teapot", None, "")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn same_handler_registered_twice_runs_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler: Arc<dyn Handler> = Arc::new(Counting { route: "/items", hits: Arc::clone(&hits) });
        let mut router = Router::default();
        router.register_shared(Arc::clone(&handler)).register_shared(handler);
        let dispatcher = Dispatcher::new(Arc::new(router));

        let res = dispatcher.dispatch(request("POST", "/items", None, "x")).await.unwrap();
        assert_eq!(res.status(), 204);
        assert_eq!(dispatcher.router().len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lowercase_handler_method_never_matches() {
        let mut router = Router::default();
        router.register(Route::new("get", "/", |_ctx: Context| async { Ok(Response::new(200, "hi")) }));
        let dispatcher = Dispatcher::new(Arc::new(router));

        let res = dispatcher.dispatch(request("GET", "/", None, "")).await.unwrap();
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn transport_method_is_not_case_folded() {
        let dispatcher = echo_router();
        let res = dispatcher.dispatch(request("get", "/users/1", None, "")).await.unwrap();
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn raw_body_passes_through() {
        let mut router = Router::default();
        router.register(Route::post("/raw", |ctx: Context| async move {
            assert_eq!(ctx.req.body(), &Body::Text("a=1".into()));
            Ok(Response::new(200, "ok"))
        }));
        let dispatcher = Dispatcher::new(Arc::new(router));

        let res = dispatcher.dispatch(request("POST", "/raw", Some("text/plain"), "a=1")).await.unwrap();
        assert_eq!(res.status(), 200);
    }
}
