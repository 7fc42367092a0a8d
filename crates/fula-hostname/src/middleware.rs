//! axum middleware applying hostname routing to live requests
//!
//! The middleware must wrap the content router from the outside (for
//! example as a layer on a `Router` whose only entry is a
//! `fallback_service`) so that rewritten paths are seen by routing.

use crate::router::{HostnameRouter, RouteDecision, RouteRequest};
use axum::{
    extract::{Request, State},
    http::{header, uri::PathAndQuery, HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Header set by reverse proxies terminating TLS
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Hostname routing middleware
pub async fn hostname_middleware(
    State(router): State<Arc<HostnameRouter>>,
    mut request: Request,
    next: Next,
) -> Response {
    // The request body is not Sync; hold no borrow of it across the await
    let Some(host) = request_host(&request).map(str::to_owned) else {
        return next.run(request).await;
    };
    let uri = request.uri().clone();
    let forwarded_proto = header_str(request.headers(), X_FORWARDED_PROTO).map(str::to_owned);

    let decision = router
        .route(&RouteRequest {
            host: &host,
            path: uri.path(),
            query: uri.query(),
            forwarded_proto: forwarded_proto.as_deref(),
        })
        .await;

    match decision {
        RouteDecision::Redirect(location) => redirect_permanent(&location),
        RouteDecision::NotFound => not_found(),
        RouteDecision::Forward { path: None } => next.run(request).await,
        RouteDecision::Forward { path: Some(path) } => {
            if let Err(e) = rewrite_path(&mut request, &path) {
                warn!(path = %path, error = %e, "Cannot rewrite request path");
                return not_found();
            }
            next.run(request).await
        }
    }
}

/// Host of a request: the `Host` header, or the URI authority for HTTP/2
pub fn request_host<B>(request: &axum::http::Request<B>) -> Option<&str> {
    header_str(request.headers(), header::HOST.as_str())
        .or_else(|| request.uri().authority().map(|authority| authority.as_str()))
}

/// Replace the path of a request URI, keeping its query string
pub fn rewrite_path<B>(
    request: &mut axum::http::Request<B>,
    path: &str,
) -> Result<(), axum::http::Error> {
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    *request.uri_mut() = Uri::from_parts(parts)?;
    Ok(())
}

/// `301 Moved Permanently` to `location`
pub fn redirect_permanent(location: &str) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// `404 Not Found`
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "404 page not found\n",
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnslink::{DnsLinkProbe, StaticNameResolver};
    use crate::gateway::HostnameSettings;
    use axum::{body::Body, middleware::from_fn_with_state, Router};
    use tower::ServiceExt;

    const RAW_CID: &str = "bafkreicysg23kiwv34eg2d7qweipxwosdo2py4ldv42nbauguluen5v6am";

    /// Content handler stand-in that echoes the URI it received
    async fn echo(uri: Uri) -> String {
        uri.to_string()
    }

    fn app() -> Router {
        let resolver = StaticNameResolver::new().with_dnslink("example.org", "/ipfs/bafy");
        let router = Arc::new(HostnameRouter::new(
            HostnameSettings::default(),
            DnsLinkProbe::new(Arc::new(resolver)),
        ));

        let content = Router::new().fallback(echo);
        Router::new()
            .fallback_service(content)
            .layer(from_fn_with_state(router, hostname_middleware))
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(host: &str, uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_redirect_response() {
        let mut request = get("dweb.link", &format!("/ipfs/{RAW_CID}?download=true"));
        request
            .headers_mut()
            .insert(X_FORWARDED_PROTO, "https".parse().unwrap());

        let (status, headers, _) = send(request).await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            headers[header::LOCATION],
            format!("https://{RAW_CID}.ipfs.dweb.link/?download=true").as_str()
        );
    }

    #[tokio::test]
    async fn test_rewrite_keeps_query() {
        let (status, _, body) = send(get(&format!("{RAW_CID}.ipfs.localhost:8080"), "/a.txt?x=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("/ipfs/{RAW_CID}/a.txt?x=1"));
    }

    #[tokio::test]
    async fn test_dnslink_rewrite() {
        let (status, _, body) = send(get("example.org", "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "/ipns/example.org/");
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let (status, headers, body) = send(get("ipfs.io", "/index.html")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(body, "404 page not found\n");
    }

    #[tokio::test]
    async fn test_passthrough() {
        let (status, _, body) = send(get("127.0.0.1:8080", &format!("/ipfs/{RAW_CID}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("/ipfs/{RAW_CID}"));
    }

    #[tokio::test]
    async fn test_missing_host_passes_through() {
        let request = axum::http::Request::builder()
            .uri("/ipfs/x")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "/ipfs/x");
    }

    #[test]
    fn test_request_host_prefers_header() {
        let request = axum::http::Request::builder()
            .uri("http://authority.example:8080/x")
            .header(header::HOST, "header.example")
            .body(())
            .unwrap();
        assert_eq!(request_host(&request), Some("header.example"));

        let request = axum::http::Request::builder()
            .uri("http://authority.example:8080/x")
            .body(())
            .unwrap();
        assert_eq!(request_host(&request), Some("authority.example:8080"));
    }

    #[test]
    fn test_rewrite_path_absolute_uri() {
        let mut request = axum::http::Request::builder()
            .uri("http://example.org/old?q=1")
            .body(())
            .unwrap();
        rewrite_path(&mut request, "/ipns/example.org/old").unwrap();
        assert_eq!(request.uri().to_string(), "http://example.org/ipns/example.org/old?q=1");
    }
}
