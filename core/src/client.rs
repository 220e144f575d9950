//! Stateless HTTP request builder and response parser for the storefront API.
//!
//! # Design
//! `ShopClient` holds only a `base_url` and carries no mutable state between
//! calls. Each API call is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Cart, CartLine, CartMutation, Product, ProductId};

/// Stateless client for the storefront API.
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: String,
}

impl ShopClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_products(&self) -> HttpRequest {
        self.get("products")
    }

    pub fn build_get_cart(&self) -> HttpRequest {
        self.get("cart")
    }

    /// Add `quantity` units of `product_id` to the cart (the views always send 1).
    pub fn build_add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<HttpRequest, ApiError> {
        self.post("cart/add", &CartMutation { product_id, quantity })
    }

    /// Set the absolute quantity of `product_id`; quantity 0 removes the line.
    pub fn build_update_cart(&self, product_id: ProductId, quantity: u32) -> Result<HttpRequest, ApiError> {
        self.post("cart/update", &CartMutation { product_id, quantity })
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response)?;
        let products: Vec<Product> =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        if let Some(product) = products.iter().find(|p| p.price.is_sign_negative() && !p.price.is_zero()) {
            return Err(ApiError::DeserializationError(format!(
                "negative price for product {}",
                product.id
            )));
        }
        Ok(products)
    }

    pub fn parse_get_cart(&self, response: HttpResponse) -> Result<Cart, ApiError> {
        check_status(&response)?;
        let lines: Vec<CartLine> =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Cart::from_lines(lines)
    }

    /// The response body of a mutation is not read; the authoritative cart
    /// always comes from a follow-up `GET /cart`.
    pub fn parse_add_to_cart(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_update_cart(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn get(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{endpoint}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post(&self, endpoint: &str, mutation: &CartMutation) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(mutation).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/{endpoint}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map any status outside 2xx to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
