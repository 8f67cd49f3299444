//! Integration test harness for the shopfront storefront.
//!
//! Each test gets its own [`TestContext`]: a `wiremock` server standing in
//! for the shop backend and the storefront router pointed at it. Requests
//! are driven through the router in-process with `tower::ServiceExt`, and the
//! session cookie is carried between calls so cart state persists.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

use shopfront_storefront::{
    app,
    config::{BackendConfig, StorefrontConfig},
    state::AppState,
};

/// A storefront wired to a mock backend.
pub struct TestContext {
    pub backend: MockServer,
    app: Router,
    cookie: Option<String>,
}

/// A fully buffered storefront response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Storefront configuration pointing at `backend_url`.
///
/// # Panics
///
/// Panics if `backend_url` is not a valid URL.
#[must_use]
pub fn test_config(backend_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        backend: BackendConfig {
            base_url: Url::parse(backend_url).expect("mock server URI is a valid URL"),
        },
        checkout_path: "/dashboardUtente".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// URL of a local port nothing is listening on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);
    format!("http://{addr}")
}

impl TestContext {
    /// Start a mock backend and a storefront that talks to it.
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        let app = app(AppState::new(test_config(&backend.uri())));
        Self {
            backend,
            app,
            cookie: None,
        }
    }

    /// Start a storefront whose backend URL points at a closed port.
    ///
    /// Every backend call fails at the transport level. The mock server is
    /// still started but never receives traffic.
    pub async fn start_with_unreachable_backend() -> Self {
        let backend = MockServer::start().await;
        let app = app(AppState::new(test_config(&closed_port_url())));
        Self {
            backend,
            app,
            cookie: None,
        }
    }

    /// Send a GET request to the storefront.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    /// Send an empty POST request to the storefront.
    pub async fn post(&mut self, path: &str) -> TestResponse {
        self.send(Method::POST, path, None).await
    }

    /// Send a form-encoded POST request to the storefront.
    pub async fn post_form(&mut self, path: &str, form: &str) -> TestResponse {
        self.send(Method::POST, path, Some(form.to_string())).await
    }

    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
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

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
