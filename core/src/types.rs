//! Domain DTOs for the storefront API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Prices travel as JSON numbers and are held as exact decimals. A `Cart` is
//! only ever built from a fetched line list; its total and item count are
//! recomputed on every call.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::money;

/// Identifier of a catalog product. Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable product as returned by `GET /products`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub inventory: u32,
}

impl Product {
    /// Whether the add-to-cart action is offered for this product.
    pub fn is_available(&self) -> bool {
        self.inventory > 0
    }

    pub fn add_to_cart_label(&self) -> &'static str {
        if self.is_available() {
            "Add to Cart"
        } else {
            "Out of Stock"
        }
    }

    pub fn display_price(&self) -> String {
        money::format_price(self.price)
    }
}

/// One product-quantity pairing as returned by `GET /cart`.
///
/// `name` and `price` are display copies of the product at the time the line
/// was written server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`, or `None` when the product does not fit a `Decimal`.
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn display_price(&self) -> String {
        money::format_price(self.price)
    }
}

/// Request body shared by `POST /cart/add` and `POST /cart/update`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A snapshot of the cart.
///
/// Lines keep the server's order. No two lines share a product id and no line
/// has quantity 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Build a cart from a fetched line list.
    ///
    /// Zero-quantity lines are dropped, since quantity 0 means the line was
    /// removed. Duplicate product ids, negative prices and totals that do
    /// not fit a `Decimal` are rejected.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, ApiError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if !seen.insert(line.product_id) {
                return Err(ApiError::DeserializationError(format!(
                    "duplicate cart line for product {}",
                    line.product_id
                )));
            }
            if line.price.is_sign_negative() && !line.price.is_zero() {
                return Err(ApiError::DeserializationError(format!(
                    "negative price for product {}",
                    line.product_id
                )));
            }
        }
        lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| {
                line.checked_subtotal().and_then(|subtotal| total.checked_add(subtotal))
            })
            .ok_or_else(|| ApiError::DeserializationError("cart total overflows".to_string()))?;
        Ok(Self {
            lines: lines.into_iter().filter(|line| line.quantity > 0).collect(),
        })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `price × quantity` over all lines, at full precision.
    ///
    /// Cannot overflow: `from_lines` already summed the same lines.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Sum of quantities; what the navigation badge shows.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The total rounded to cents, e.g. `"29.97"`.
    pub fn display_total(&self) -> String {
        money::format_amount(self.total())
    }
}
