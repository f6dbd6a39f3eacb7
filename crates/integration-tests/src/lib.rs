//! Integration tests for SimpleMART.
//!
//! The storefront talks to three external APIs. These tests stand up
//! in-process `axum` servers on `127.0.0.1:0` that imitate them, point a
//! [`StorefrontConfig`] at those servers, and drive the real clients and
//! flows end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p simplemart-integration-tests
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use simplemart_storefront::config::{ConfigError, StorefrontConfig};
use tokio::net::TcpListener;
use url::Url;

/// Username the fake auth endpoint accepts.
pub const VALID_USERNAME: &str = "mor_2314";
/// Password the fake auth endpoint accepts.
pub const VALID_PASSWORD: &str = "83r5^_";
/// Token the fake auth endpoint issues.
pub const ISSUED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-token";

/// Bind `router` to an ephemeral local port and serve it in the background.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Url::parse(&format!("http://{addr}")).expect("Failed to build server URL")
}

/// Build a config from `(key, value)` overrides on top of defaults.
///
/// # Errors
///
/// Returns the config error for invalid overrides.
pub fn config_with(overrides: &[(&str, String)]) -> Result<StorefrontConfig, ConfigError> {
    StorefrontConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
}

// =============================================================================
// Fake catalog + auth API
// =============================================================================

/// In-process stand-in for the catalog and login API.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    product_list_hits: Arc<AtomicUsize>,
    user_hits: Arc<AtomicUsize>,
}

impl FakeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `GET /products` was served.
    #[must_use]
    pub fn product_list_hits(&self) -> usize {
        self.product_list_hits.load(Ordering::SeqCst)
    }

    /// How many times `GET /users/{id}` was served.
    #[must_use]
    pub fn user_hits(&self) -> usize {
        self.user_hits.load(Ordering::SeqCst)
    }

    /// Serve the fake API and return its base URL.
    pub async fn spawn(&self) -> Url {
        let router = Router::new()
            .route("/products", get(list_products))
            .route("/products/categories", get(list_categories))
            .route("/products/{id}", get(get_product))
            .route("/users/{id}", get(get_user))
            .route("/auth/login", post(login))
            .with_state(self.clone());
        spawn(router).await
    }
}

/// The fixed product list the fake catalog serves.
#[must_use]
pub fn sample_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://img.example/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 5,
            "title": "Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection",
            "category": "jewelery",
            "image": "https://img.example/5.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        },
        {
            "id": 9,
            "title": "WD 2TB Portable External Hard Drive",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility",
            "category": "electronics",
            "image": "https://img.example/9.jpg",
            "rating": { "rate": 3.3, "count": 203 }
        }
    ])
}

async fn list_products(State(fake): State<FakeCatalog>) -> Json<Value> {
    fake.product_list_hits.fetch_add(1, Ordering::SeqCst);
    Json(sample_products())
}

async fn list_categories() -> Json<Value> {
    Json(json!(["electronics", "jewelery", "men's clothing"]))
}

async fn get_product(Path(id): Path<i64>) -> Response {
    let products = sample_products();
    let found = products
        .as_array()
        .and_then(|list| list.iter().find(|p| p["id"] == json!(id)))
        .cloned();

    // The real API answers unknown ids with 200 and an empty body
    found.map_or_else(|| String::new().into_response(), |p| Json(p).into_response())
}

/// The one account the fake users endpoint knows about.
#[must_use]
pub fn sample_user() -> Value {
    json!({
        "address": {
            "geolocation": { "lat": "-37.3159", "long": "81.1496" },
            "city": "kilcoole",
            "street": "new road",
            "number": 7682,
            "zipcode": "12926-3874"
        },
        "id": 1,
        "email": "john@gmail.com",
        "username": "johnd",
        "password": "m38rmF$",
        "name": { "firstname": "john", "lastname": "doe" },
        "phone": "1-570-236-7033",
        "__v": 0
    })
}

async fn get_user(State(fake): State<FakeCatalog>, Path(id): Path<i64>) -> Response {
    fake.user_hits.fetch_add(1, Ordering::SeqCst);
    let user = sample_user();
    if user["id"] == json!(id) {
        Json(user).into_response()
    } else {
        String::new().into_response()
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == VALID_USERNAME && body["password"] == VALID_PASSWORD {
        Json(json!({ "token": ISSUED_TOKEN })).into_response()
    } else if body["username"] == "json-error" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Account locked" })),
        )
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "username or password is incorrect").into_response()
    }
}

// =============================================================================
// Fake payment API
// =============================================================================

/// A request received by [`FakePayments`].
#[derive(Debug, Clone)]
pub struct RecordedInvoice {
    pub authorization: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the invoice API. Records every request.
#[derive(Clone)]
pub struct FakePayments {
    status: StatusCode,
    requests: Arc<Mutex<Vec<RecordedInvoice>>>,
}

impl FakePayments {
    /// A gateway that answers every invoice with `status`.
    #[must_use]
    pub fn responding_with(status: StatusCode) -> Self {
        Self {
            status,
            requests: Arc::default(),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedInvoice> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Serve the fake API and return its base URL.
    pub async fn spawn(&self) -> Url {
        let router = Router::new()
            .route("/v2/invoices", post(create_invoice))
            .with_state(self.clone());
        spawn(router).await
    }
}

async fn create_invoice(
    State(fake): State<FakePayments>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let external_id = body["external_id"].clone();

    fake.requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedInvoice {
            authorization,
            body,
        });

    if !fake.status.is_success() {
        return (
            fake.status,
            Json(json!({ "error_code": "INVALID_API_KEY", "message": "API key is invalid" })),
        )
            .into_response();
    }

    Json(json!({
        "id": "inv_123",
        "external_id": external_id,
        "status": "PENDING",
        "invoice_url": "https://checkout.example/web/inv_123"
    }))
    .into_response()
}
