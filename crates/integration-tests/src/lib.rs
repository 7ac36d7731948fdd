//! Integration tests for Doraemon Delights.
//!
//! The storefront router is driven in-process with `tower::ServiceExt`; no
//! server or network is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p delights-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pages` - Home, menu, health and request ids
//! - `cart` - HTMX cart operations and session isolation
//! - `checkout` - Validation, order placement and kitchen failures

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use delights_storefront::config::{KitchenConfig, StorefrontConfig};
use delights_storefront::routes;
use delights_storefront::state::AppState;
use tower::ServiceExt;

/// A visitor talking to an in-process storefront.
///
/// Keeps the session cookie between requests like a browser would.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

/// Status, headers and body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A response header as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Storefront with an instant kitchen that accepts every order.
    #[must_use]
    pub fn new() -> Self {
        Self::with_kitchen(KitchenConfig {
            latency: Duration::ZERO,
            failure_rate: 0.0,
        })
    }

    /// Storefront with custom kitchen behavior.
    #[must_use]
    pub fn with_kitchen(kitchen: KitchenConfig) -> Self {
        let config = StorefrontConfig {
            kitchen,
            ..StorefrontConfig::default()
        };

        Self {
            router: routes::app(AppState::new(config)),
            cookie: None,
        }
    }

    /// A second visitor on the same storefront, with no session yet.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Another tab of the same visitor, sharing the session cookie.
    #[must_use]
    pub fn new_tab(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    /// Whether the visitor holds a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path), Body::empty()).await
    }

    /// Send a form-encoded POST request.
    pub async fn post_form(&mut self, path: &str, body: &str) -> TestResponse {
        let builder = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(builder, Body::from(body.to_owned())).await
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match builder.body(body) {
            Ok(request) => request,
            Err(e) => panic!("invalid test request: {e}"),
        };

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let status = response.status();
        let headers = response.headers().clone();
        if let Some(cookie) = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_owned());
        }

        let bytes = match to_bytes(response.into_body(), usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => panic!("failed to read response body: {e}"),
        };

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
