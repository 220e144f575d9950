//! The navigation badge and the observer contract that keeps it current.

use std::sync::Arc;

use async_trait::async_trait;
use shop_core::ShopClient;
use tokio::sync::watch;
use tracing::{error, instrument};

use crate::notify::Toaster;
use crate::transport::Transport;

pub const BADGE_REFRESH_FAILED: &str = "Failed to fetch cart. Please try again.";

/// Notified after any action that changed the cart server-side.
#[async_trait]
pub trait CartListener: Send + Sync {
    async fn cart_changed(&self);
}

/// Item count shown in the navigation, re-derived from `GET /cart` on every
/// refresh. It is never written by the views themselves.
pub struct CartBadge {
    client: ShopClient,
    transport: Arc<dyn Transport>,
    toaster: Toaster,
    count: watch::Sender<u64>,
}

impl CartBadge {
    pub fn new(client: ShopClient, transport: Arc<dyn Transport>, toaster: Toaster) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            client,
            transport,
            toaster,
            count,
        }
    }

    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    /// Re-fetch the cart and publish its item count. On failure the previous
    /// count stays and an error toast is shown.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let request = self.client.build_get_cart();
        let result = match self.transport.execute(request).await {
            Ok(response) => self.client.parse_get_cart(response),
            Err(e) => Err(e),
        };
        match result {
            Ok(cart) => {
                self.count.send_replace(cart.item_count());
            }
            Err(e) => {
                error!(error = %e, "error fetching cart");
                self.toaster.error(BADGE_REFRESH_FAILED);
            }
        }
    }
}

#[async_trait]
impl CartListener for CartBadge {
    async fn cart_changed(&self) {
        self.refresh().await;
    }
}
