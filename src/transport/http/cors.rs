//! CORS allow-list.
//!
//! `CorsLayer` only decides which headers to send back and never refuses a
//! request, so `reject_disallowed_origin` answers 403 for unknown origins
//! before routing.

use crate::transport::http::error::ApiError;
use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::PATCH];

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    pub fn new<S: AsRef<str>>(origins: &[S]) -> anyhow::Result<Self> {
        let origins = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.as_ref())
                    .with_context(|| format!("invalid CORS origin '{}'", o.as_ref()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { origins })
    }

    /// Requests without an `Origin` header are always allowed.
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => true,
            Some(o) => self.origins.iter().any(|allowed| allowed == o),
        }
    }

    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods(ALLOWED_METHODS.to_vec())
            .allow_headers([header::CONTENT_TYPE])
    }
}

pub async fn reject_disallowed_origin(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if !policy.allows(origin) {
        tracing::warn!(
            origin = ?origin,
            method = %request.method(),
            path = %request.uri().path(),
            "rejected cross-origin request"
        );
        return ApiError::CorsRejected.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_missing_and_listed_origins_only() {
        let policy = CorsPolicy::new(&["http://localhost:3000"]).unwrap();
        assert!(policy.allows(None));
        assert!(policy.allows(Some(&HeaderValue::from_static("http://localhost:3000"))));
        assert!(!policy.allows(Some(&HeaderValue::from_static("http://localhost:3001"))));
        assert!(!policy.allows(Some(&HeaderValue::from_static("http://evil.test"))));
    }

    #[test]
    fn rejects_origins_that_are_not_header_values() {
        assert!(CorsPolicy::new(&["http://bad\norigin"]).is_err());
    }
}
