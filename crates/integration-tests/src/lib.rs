//! Integration test harness for Sweet Bites.
//!
//! Drives the full storefront router in-process (no TCP listener) with an
//! in-memory session store. [`TestApp`] behaves like a single browser: it
//! keeps the session cookie from each response and sends it on the next
//! request.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-bites-integration-tests
//! ```

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use sweet_bites_core::Catalog;
use sweet_bites_storefront::{
    AppState, app, config::StorefrontConfig, middleware::create_session_layer,
    middleware::SESSION_COOKIE_NAME,
};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// A storefront instance plus one visitor's cookie jar.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }

    /// Value of a response header, if present and valid UTF-8.
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
    /// Storefront with the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::default_bakery())
    }

    /// Storefront with a custom catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        let config = StorefrontConfig {
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
            ..StorefrontConfig::default()
        };
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let router = app(AppState::new(config, catalog, None), session_layer);

        Self {
            router,
            cookie: None,
        }
    }

    /// Forget the session cookie, as a new visitor would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST request with an empty body.
    pub async fn post(&mut self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    /// Send a POST request with a urlencoded form body.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(form.to_string())).await
    }

    /// Current cart count as reported by `/cart/count`.
    ///
    /// # Panics
    ///
    /// Panics if the endpoint does not return a count.
    pub async fn cart_count(&mut self) -> u64 {
        let response = self.get("/cart/count").await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["cart_count"]
            .as_u64()
            .expect("cart_count missing")
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form)
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if let Some(pair) = value.split(';').next().filter(|p| p.starts_with(&prefix)) {
                self.cookie = Some(pair.to_string());
            }
        }
    }
}
