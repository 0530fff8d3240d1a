//! Integration tests for Vitrina.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Sheet payload to catalog to filters
//! - `storefront_cart_flow` - Cart and order over HTTP with a session cookie
//!
//! Both start real listeners on `127.0.0.1:0`: a stand-in for the published
//! sheet and the storefront itself. Nothing leaves the machine.

use axum::{Router, http::header, routing::get};
use reqwest::{Client, Response, redirect::Policy};
use tokio::net::TcpListener;
use url::Url;
use vitrina_core::Catalog;
use vitrina_storefront::{
    app,
    config::{
        CatalogConfig, DEFAULT_GREETING, DEFAULT_LINK_TEMPLATE, OrderConfig, StorefrontConfig,
        resolve_link_template,
    },
    state::AppState,
};

/// Phone number used by [`test_config`].
pub const TEST_PHONE: &str = "5491100000000";

/// A gviz response with three good rows, one bad price and one duplicate id.
pub const SHEET_BODY: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"42","table":{"cols":[{"id":"A","label":"id","type":"number"},{"id":"B","label":"nombre","type":"string"},{"id":"C","label":"precio","type":"number"}],"rows":[{"c":[{"v":1.0,"f":"1"},{"v":"Widget"},{"v":9.99,"f":"9.99"},{"v":"https://img.example/widget.jpg"},{"v":"A sturdy widget"},{"v":"Acme"},{"v":"Tools"}]},{"c":[{"v":2.0,"f":"2"},{"v":"Gadget"},{"v":15,"f":"15"},null,{"v":"Shiny gadget"},{"v":"Globex"},{"v":"Toys"}]},{"c":[{"v":3.0,"f":"3"},{"v":"Hammer"},{"v":"$4.50"},null,{"v":"Heavy"},{"v":"Acme"},{"v":"Tools"}]},{"c":[{"v":4.0,"f":"4"},{"v":"Mystery"},{"v":"ask"},null,null,null,null]},{"c":[{"v":1.0,"f":"1"},{"v":"Widget copy"},{"v":1}]}],"parsedNumHeaders":1}});"#;

/// Storefront configuration pointing at `sheet_url`.
///
/// # Panics
///
/// Panics if the built-in link template is invalid.
#[must_use]
pub fn test_config(sheet_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::Ipv4Addr::LOCALHOST.into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        store_name: "Vitrina Test".to_string(),
        catalog: CatalogConfig { sheet_url },
        order: OrderConfig {
            link_template: resolve_link_template("ORDER_LINK_TEMPLATE", DEFAULT_LINK_TEMPLATE, TEST_PHONE)
                .expect("default link template is valid"),
            greeting: DEFAULT_GREETING.to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{addr}")
}

/// Serve `body` the way the gviz endpoint does and return its URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn serve_sheet(body: &'static str) -> Url {
    let router = Router::new().route(
        "/gviz/tq",
        get(move || async move { ([(header::CONTENT_TYPE, "text/javascript")], body) }),
    );
    let base = serve(router).await;

    Url::parse(&format!("{base}/gviz/tq?tqx=out:json")).expect("valid sheet URL")
}

/// A running storefront and a client that keeps its session cookie.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront serving `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn start(catalog: Catalog) -> Self {
        let config = test_config(Url::parse("http://127.0.0.1:9/unused").expect("valid URL"));
        let base_url = serve(app(AppState::new(config, catalog))).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("build client");

        Self { client, base_url }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// POST a urlencoded form to `path` as HTMX would.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_post(&self, path: &str, form: &str) -> Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form.to_string())
            .send()
            .await
            .expect("POST request")
    }

    /// POST a urlencoded form to `path` as a plain browser form would.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn form_post(&self, path: &str, form: &str) -> Response {
        self.client
            .post(self.url(path))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form.to_string())
            .send()
            .await
            .expect("POST request")
    }
}
