use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "cart_session";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub inventory: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub product_id: u64,
    pub quantity: u32,
}

/// Catalog plus one cart per session cookie. Cart lines keep insertion order.
#[derive(Debug, Default)]
pub struct Store {
    catalog: Vec<Product>,
    carts: HashMap<Uuid, Vec<CartLine>>,
}

pub type Db = Arc<RwLock<Store>>;

/// Catalog served by the binary and by `app()`.
pub fn seed_catalog() -> Vec<Product> {
    vec![
        Product { id: 1, name: "Widget".to_string(), price: Decimal::new(999, 2), inventory: 2 },
        Product { id: 2, name: "Gadget".to_string(), price: Decimal::new(2450, 2), inventory: 10 },
        Product { id: 3, name: "Doohickey".to_string(), price: Decimal::new(5, 0), inventory: 0 },
    ]
}

pub fn app() -> Router {
    app_with_catalog(seed_catalog())
}

pub fn app_with_catalog(catalog: Vec<Product>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        catalog,
        carts: HashMap::new(),
    }));
    let api = Router::new()
        .route("/products", get(list_products))
        .route("/cart", get(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update", post(update_cart))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Product>> {
    Json(db.read().await.catalog.clone())
}

async fn get_cart(State(db): State<Db>, headers: HeaderMap) -> Response {
    let (session, fresh) = session(&headers);
    let lines = db.read().await.carts.get(&session).cloned().unwrap_or_default();
    with_session(session, fresh, Json(lines))
}

async fn add_to_cart(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CartMutation>,
) -> Response {
    let (session, fresh) = session(&headers);
    let mut store = db.write().await;
    let Some(product) = store.catalog.iter().find(|p| p.id == input.product_id).cloned() else {
        tracing::debug!(product_id = input.product_id, "add for unknown product");
        return StatusCode::NOT_FOUND.into_response();
    };
    let cart = store.carts.entry(session).or_default();
    if let Some(line) = cart.iter_mut().find(|line| line.product_id == product.id) {
        line.quantity = line.quantity.saturating_add(input.quantity);
    } else if input.quantity > 0 {
        cart.push(CartLine {
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity: input.quantity,
        });
    }
    with_session(session, fresh, Json(cart.clone()))
}

async fn update_cart(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CartMutation>,
) -> Response {
    let (session, fresh) = session(&headers);
    let mut store = db.write().await;
    let Some(product) = store.catalog.iter().find(|p| p.id == input.product_id).cloned() else {
        tracing::debug!(product_id = input.product_id, "update for unknown product");
        return StatusCode::NOT_FOUND.into_response();
    };
    let cart = store.carts.entry(session).or_default();
    if input.quantity == 0 {
        cart.retain(|line| line.product_id != product.id);
    } else if let Some(line) = cart.iter_mut().find(|line| line.product_id == product.id) {
        line.quantity = input.quantity;
    } else {
        cart.push(CartLine {
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity: input.quantity,
        });
    }
    with_session(session, fresh, Json(cart.clone()))
}

/// Session id from the `Cookie` header, or a new one (second value `true`).
fn session(headers: &HeaderMap) -> (Uuid, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok());
    match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    }
}

fn with_session(session: Uuid, fresh: bool, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if fresh {
        let cookie = format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}
