//! Request ids and failed-response logging.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{Level, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 64;

/// Id carried in the request extensions and echoed on the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse a well-formed id sent by the client (typically a proxy), or mint one.
    fn for_request(request: &Request<Body>) -> Self {
        request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| is_acceptable_id(value))
            .map(|value| Self(value.to_string()))
            .unwrap_or_else(|| Self(Uuid::new_v4().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_acceptable_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
}

pub async fn assign_request_id(mut request: Request<Body>, next: Next) -> Response {
    let request_id = RequestId::for_request(&request);
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Level a finished response is logged at; successes are not logged.
fn failure_level(status: StatusCode) -> Option<Level> {
    if status.is_server_error() {
        Some(Level::ERROR)
    } else if status.is_client_error() {
        Some(Level::WARN)
    } else {
        None
    }
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    let Some(level) = failure_level(status) else {
        return response;
    };

    let elapsed_ms = start.elapsed().as_millis();
    // Routing and extractor rejections carry no report.
    let (source, chain) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("axum::rejection", Vec::new()),
    };
    let detail = chain.first().map(String::as_str).unwrap_or("-");

    if level == Level::ERROR {
        error!(
            target = "postboard::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            request_id = %request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "postboard::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms,
            source,
            detail,
            request_id = %request_id,
            "request rejected",
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_restricted_to_short_tokens() {
        assert!(is_acceptable_id("edge-7f3a_01"));
        assert!(!is_acceptable_id(""));
        assert!(!is_acceptable_id("has space"));
        assert!(!is_acceptable_id("line\nbreak"));
        assert!(!is_acceptable_id(&"a".repeat(MAX_REQUEST_ID_LEN + 1)));
    }

    #[test]
    fn incoming_id_is_reused_only_when_well_formed() {
        let request = Request::builder()
            .header(&REQUEST_ID_HEADER, "upstream-42")
            .body(Body::empty())
            .expect("request");
        assert_eq!(RequestId::for_request(&request).as_str(), "upstream-42");

        let request = Request::builder()
            .header(&REQUEST_ID_HEADER, "not/allowed")
            .body(Body::empty())
            .expect("request");
        let minted = RequestId::for_request(&request);
        assert!(Uuid::parse_str(minted.as_str()).is_ok());
    }

    #[test]
    fn only_failures_are_logged() {
        assert_eq!(failure_level(StatusCode::OK), None);
        assert_eq!(failure_level(StatusCode::SEE_OTHER), None);
        assert_eq!(failure_level(StatusCode::NOT_FOUND), Some(Level::WARN));
        assert_eq!(
            failure_level(StatusCode::INTERNAL_SERVER_ERROR),
            Some(Level::ERROR)
        );
    }
}
