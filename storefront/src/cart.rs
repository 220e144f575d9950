//! Cart view: keeps a local snapshot in sync with the server's cart.
//!
//! Mutations are never applied locally. Each one is sent, awaited, and then
//! followed by a fresh `GET /cart` whose result becomes the view state.

use std::fmt::Write as _;
use std::sync::Arc;

use shop_core::{ApiError, Cart, ProductId, ShopClient};
use tracing::{error, info, instrument, warn};

use crate::badge::CartListener;
use crate::notify::Toaster;
use crate::transport::Transport;
use crate::view::{ViewLifetime, ViewState};

pub const LOAD_CART_FAILED: &str = "Failed to load cart. Please try again later.";
pub const CART_UPDATED: &str = "Cart updated successfully!";
pub const UPDATE_CART_FAILED: &str = "Failed to update cart. Please try again.";

pub struct CartSynchronizer {
    client: ShopClient,
    transport: Arc<dyn Transport>,
    toaster: Toaster,
    listener: Arc<dyn CartListener>,
    state: ViewState<Cart>,
    lifetime: ViewLifetime,
}

impl CartSynchronizer {
    pub fn new(
        client: ShopClient,
        transport: Arc<dyn Transport>,
        toaster: Toaster,
        listener: Arc<dyn CartListener>,
    ) -> Self {
        Self {
            client,
            transport,
            toaster,
            listener,
            state: ViewState::Loading,
            lifetime: ViewLifetime::new(),
        }
    }

    pub fn state(&self) -> &ViewState<Cart> {
        &self.state
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub fn unmount(&self) {
        self.lifetime.cancel();
    }

    #[instrument(skip(self))]
    pub async fn load_cart(&mut self) {
        self.state = ViewState::Loading;
        let Some(result) = self.lifetime.run(self.fetch_cart()).await else {
            return;
        };
        match result {
            Ok(cart) => {
                info!(lines = cart.lines().len(), "cart loaded");
                self.state = ViewState::Ready(cart);
            }
            Err(e) => {
                error!(error = %e, "error fetching cart");
                self.fail(LOAD_CART_FAILED);
            }
        }
    }

    /// Set the absolute quantity of one line; 0 removes it.
    ///
    /// The chain is update, re-fetch, listener, success toast. A failure at
    /// either network step ends the chain with one error toast and the
    /// `Error` state, whether or not the update itself went through.
    ///
    /// The listener belongs to the shell, so once the server has accepted the
    /// update it is notified even if this view was unmounted meanwhile.
    #[instrument(skip(self))]
    pub async fn set_line_quantity(&mut self, product_id: ProductId, quantity: u32) {
        self.state = ViewState::Loading;
        let Some(updated) = self.lifetime.run(self.post_update(product_id, quantity)).await else {
            return;
        };
        if let Err(e) = updated {
            error!(error = %e, "error updating cart");
            self.fail(UPDATE_CART_FAILED);
            return;
        }

        let Some(fetched) = self.lifetime.run(self.fetch_cart()).await else {
            self.listener.cart_changed().await;
            return;
        };
        match fetched {
            Ok(cart) => {
                info!(lines = cart.lines().len(), "cart resynchronized");
                self.state = ViewState::Ready(cart);
            }
            Err(e) => {
                error!(error = %e, "error refreshing cart after update");
                self.fail(UPDATE_CART_FAILED);
                return;
            }
        }
        self.listener.cart_changed().await;
        if !self.lifetime.is_cancelled() {
            self.toaster.success(CART_UPDATED);
        }
    }

    pub async fn remove_line(&mut self, product_id: ProductId) {
        self.set_line_quantity(product_id, 0).await;
    }

    /// Quantity as typed by the user. Anything that is not a non-negative
    /// integer is rejected with the update error and no request is sent.
    pub async fn set_line_quantity_input(&mut self, product_id: ProductId, input: &str) {
        match input.trim().parse::<u32>() {
            Ok(quantity) => self.set_line_quantity(product_id, quantity).await,
            Err(e) => {
                warn!(%product_id, input, error = %e, "rejected quantity input");
                self.toaster.error(UPDATE_CART_FAILED);
            }
        }
    }

    /// Text rendering of the view. The total is computed from the held lines
    /// on every call.
    pub fn render(&self) -> String {
        let cart = match &self.state {
            ViewState::Loading => return "Loading...\n".to_string(),
            ViewState::Error(message) => return format!("{message}\n"),
            ViewState::Ready(cart) => cart,
        };
        let mut out = String::from("Your Cart\n");
        if cart.is_empty() {
            out.push_str("Your cart is empty.\n");
            return out;
        }
        for line in cart.lines() {
            let _ = writeln!(
                out,
                "[{}] {} - ${} each x{}",
                line.product_id,
                line.name,
                line.display_price(),
                line.quantity
            );
        }
        let _ = writeln!(out, "Total: ${}", cart.display_total());
        out
    }

    fn fail(&mut self, message: &str) {
        self.state = ViewState::Error(message.to_string());
        self.toaster.error(message);
    }

    async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        let response = self.transport.execute(self.client.build_get_cart()).await?;
        self.client.parse_get_cart(response)
    }

    async fn post_update(&self, product_id: ProductId, quantity: u32) -> Result<(), ApiError> {
        let request = self.client.build_update_cart(product_id, quantity)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_cart(response)
    }
}
