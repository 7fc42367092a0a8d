//! Content handler: relays routed requests to the upstream gateway

use crate::middleware::{RequestId, REQUEST_ID_HEADER};
use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri},
    response::Response,
    Extension,
};
use std::sync::Arc;
use tracing::debug;

/// Headers that describe a single connection and are never relayed
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// GET/HEAD on any path - fetch from the upstream gateway
pub async fn forward_content(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ApiError::MethodNotAllowed(method.to_string()));
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = format!("{}{}", state.upstream_base(), path_and_query);

    let mut request_headers = headers;
    remove_hop_by_hop(&mut request_headers);
    if let Some(host) = request_headers.remove(header::HOST) {
        if !request_headers.contains_key("x-forwarded-host") {
            request_headers.insert(HeaderName::from_static("x-forwarded-host"), host);
        }
    }
    if let Some(Extension(RequestId(id))) = request_id {
        if let Ok(value) = HeaderValue::from_str(&id) {
            request_headers.insert(REQUEST_ID_HEADER, value);
        }
    }

    debug!(method = %method, url = %url, "Forwarding to upstream");
    let upstream = state
        .upstream
        .request(method.clone(), &url)
        .headers(request_headers)
        .send()
        .await?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    remove_hop_by_hop(&mut response_headers);

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from_stream(upstream.bytes_stream())
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Strip hop-by-hop headers, including any named by `Connection`
pub fn remove_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::try_from(name.trim()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}
