//! Product listing view.

use std::fmt::Write as _;
use std::sync::Arc;

use shop_core::{ApiError, Product, ProductId, ShopClient};
use tracing::{error, info, instrument, warn};

use crate::badge::CartListener;
use crate::notify::Toaster;
use crate::transport::Transport;
use crate::view::{ViewLifetime, ViewState};

pub const LOAD_PRODUCTS_FAILED: &str = "Failed to load products. Please try again later.";
pub const ADDED_TO_CART: &str = "Product added to cart!";
pub const ADD_TO_CART_FAILED: &str = "Failed to add product to cart. Please try again.";

/// Holds the catalog for one mount of the products view.
pub struct ProductLister {
    client: ShopClient,
    transport: Arc<dyn Transport>,
    toaster: Toaster,
    listener: Arc<dyn CartListener>,
    state: ViewState<Vec<Product>>,
    lifetime: ViewLifetime,
}

impl ProductLister {
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

    pub fn state(&self) -> &ViewState<Vec<Product>> {
        &self.state
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub fn unmount(&self) {
        self.lifetime.cancel();
    }

    /// Replace the held catalog with `GET /products`.
    ///
    /// A failure leaves the view in `Error` until the next mount; there is no
    /// automatic retry.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) {
        self.state = ViewState::Loading;
        let Some(result) = self.lifetime.run(self.fetch_catalog()).await else {
            return;
        };
        match result {
            Ok(products) => {
                info!(count = products.len(), "catalog loaded");
                self.state = ViewState::Ready(products);
            }
            Err(e) => {
                error!(error = %e, "error fetching products");
                self.state = ViewState::Error(LOAD_PRODUCTS_FAILED.to_string());
                self.toaster.error(LOAD_PRODUCTS_FAILED);
            }
        }
    }

    /// Add one unit of `product_id` to the cart.
    ///
    /// Refused without a request when the held catalog lists the product as
    /// out of stock. Failures only toast; the held catalog is left as is.
    /// An accepted add always notifies the listener, even after unmount.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&mut self, product_id: ProductId) {
        if self.product(product_id).is_some_and(|p| !p.is_available()) {
            warn!(%product_id, "add to cart refused, product is out of stock");
            return;
        }

        let Some(result) = self.lifetime.run(self.post_add(product_id)).await else {
            return;
        };
        if let Err(e) = result {
            error!(error = %e, "error adding to cart");
            self.toaster.error(ADD_TO_CART_FAILED);
            return;
        }
        self.listener.cart_changed().await;
        if !self.lifetime.is_cancelled() {
            self.toaster.success(ADDED_TO_CART);
        }
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.state.data()?.iter().find(|p| p.id == product_id)
    }

    /// Text rendering of the view: spinner, inline error, or product cards.
    pub fn render(&self) -> String {
        let products = match &self.state {
            ViewState::Loading => return "Loading...\n".to_string(),
            ViewState::Error(message) => return format!("{message}\n"),
            ViewState::Ready(products) => products,
        };
        let mut out = String::from("Our Products\n");
        for product in products {
            let _ = writeln!(out, "\n[{}] {}", product.id, product.name);
            let _ = writeln!(out, "  Price: ${}", product.display_price());
            let _ = writeln!(out, "  In stock: {}", product.inventory);
            let _ = writeln!(out, "  <{}>", product.add_to_cart_label());
        }
        out
    }

    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.transport.execute(self.client.build_list_products()).await?;
        self.client.parse_list_products(response)
    }

    async fn post_add(&self, product_id: ProductId) -> Result<(), ApiError> {
        let request = self.client.build_add_to_cart(product_id, 1)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_add_to_cart(response)
    }
}

#[cfg(test)]
mod tests {
    use shop_core::HttpMethod;

    use super::*;
    use crate::notify::{self, Toast, ToastKind, Toasts};
    use crate::testing::{CountingListener, Reply, ScriptedTransport, BASE_URL};

    const CATALOG: &str = r#"[
        {"id":1,"name":"Widget","price":9.99,"inventory":2},
        {"id":2,"name":"Gizmo","price":4,"inventory":1},
        {"id":3,"name":"Doohickey","price":5,"inventory":0}
    ]"#;

    fn lister(transport: Arc<ScriptedTransport>) -> (ProductLister, Toasts, Arc<CountingListener>) {
        let (toaster, toasts) = notify::channel();
        let listener = Arc::new(CountingListener::default());
        let lister = ProductLister::new(ShopClient::new(BASE_URL), transport, toaster, listener.clone());
        (lister, toasts, listener)
    }

    #[tokio::test]
    async fn starts_loading() {
        let (lister, _, _) = lister(ScriptedTransport::new([]));
        assert!(lister.state().is_loading());
        assert_eq!(lister.render(), "Loading...\n");
    }

    #[tokio::test]
    async fn load_catalog_success_holds_exact_list() {
        let (mut lister, mut toasts, _) = lister(ScriptedTransport::new([Reply::Respond(200, CATALOG)]));

        lister.load_catalog().await;

        let state = lister.state();
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        let ids: Vec<u64> = state.data().unwrap().iter().map(|p| p.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(toasts.drain().is_empty());
    }

    #[tokio::test]
    async fn load_catalog_transport_failure_sets_error() {
        let (mut lister, mut toasts, _) = lister(ScriptedTransport::new([Reply::Fail]));

        lister.load_catalog().await;

        assert!(!lister.state().is_loading());
        assert_eq!(lister.state().error(), Some(LOAD_PRODUCTS_FAILED));
        assert_eq!(
            toasts.drain(),
            vec![Toast { kind: ToastKind::Error, message: LOAD_PRODUCTS_FAILED.to_string() }]
        );
        assert_eq!(lister.render(), format!("{LOAD_PRODUCTS_FAILED}\n"));
    }

    #[tokio::test]
    async fn load_catalog_server_error_sets_error() {
        let (mut lister, _, _) = lister(ScriptedTransport::new([Reply::Respond(503, "")]));
        lister.load_catalog().await;
        assert!(lister.state().error().is_some());
    }

    #[tokio::test]
    async fn render_labels_follow_inventory() {
        let (mut lister, _, _) = lister(ScriptedTransport::new([Reply::Respond(200, CATALOG)]));
        lister.load_catalog().await;

        let text = lister.render();
        assert!(text.starts_with("Our Products\n"));
        assert!(text.contains("[1] Widget\n  Price: $9.99\n  In stock: 2\n  <Add to Cart>"));
        assert!(text.contains("[2] Gizmo\n  Price: $4\n  In stock: 1\n  <Add to Cart>"));
        assert!(text.contains("[3] Doohickey\n  Price: $5\n  In stock: 0\n  <Out of Stock>"));
    }

    #[tokio::test]
    async fn add_to_cart_success_notifies_listener_then_toasts() {
        let transport = ScriptedTransport::new([
            Reply::Respond(200, CATALOG),
            Reply::Respond(200, "[]"),
        ]);
        let (mut lister, mut toasts, listener) = lister(transport.clone());
        lister.load_catalog().await;

        lister.add_to_cart(ProductId::new(1)).await;

        assert_eq!(listener.calls(), 1);
        assert_eq!(
            toasts.drain(),
            vec![Toast { kind: ToastKind::Success, message: ADDED_TO_CART.to_string() }]
        );
        assert_eq!(
            transport.sent(),
            vec![
                (HttpMethod::Get, "/products".to_string()),
                (HttpMethod::Post, "/cart/add".to_string()),
            ]
        );
        assert!(lister.state().data().is_some());
    }

    #[tokio::test]
    async fn add_to_cart_failure_only_toasts() {
        let transport = ScriptedTransport::new([Reply::Respond(200, CATALOG), Reply::Fail]);
        let (mut lister, mut toasts, listener) = lister(transport);
        lister.load_catalog().await;

        lister.add_to_cart(ProductId::new(2)).await;

        assert_eq!(listener.calls(), 0);
        assert_eq!(
            toasts.drain(),
            vec![Toast { kind: ToastKind::Error, message: ADD_TO_CART_FAILED.to_string() }]
        );
        assert!(lister.state().data().is_some());
        assert!(lister.state().error().is_none());
    }

    #[tokio::test]
    async fn out_of_stock_product_is_not_sent() {
        let transport = ScriptedTransport::new([Reply::Respond(200, CATALOG)]);
        let (mut lister, mut toasts, listener) = lister(transport.clone());
        lister.load_catalog().await;

        lister.add_to_cart(ProductId::new(3)).await;

        assert_eq!(transport.sent().len(), 1);
        assert_eq!(listener.calls(), 0);
        assert!(toasts.drain().is_empty());
    }

    /// Unmounts the view from inside the badge refresh.
    struct UnmountingListener {
        token: tokio_util::sync::CancellationToken,
        inner: CountingListener,
    }

    #[async_trait::async_trait]
    impl CartListener for UnmountingListener {
        async fn cart_changed(&self) {
            self.token.cancel();
            self.inner.cart_changed().await;
        }
    }

    #[tokio::test]
    async fn accepted_add_notifies_listener_but_skips_toast_after_unmount() {
        let transport = ScriptedTransport::new([Reply::Respond(200, CATALOG), Reply::Respond(200, "[]")]);
        let (toaster, mut toasts) = notify::channel();
        let mut lister = ProductLister::new(
            ShopClient::new(BASE_URL),
            transport,
            toaster,
            Arc::new(CountingListener::default()),
        );
        let listener = Arc::new(UnmountingListener {
            token: lister.lifetime().token(),
            inner: CountingListener::default(),
        });
        let shared: Arc<dyn CartListener> = listener.clone();
        lister.listener = shared;
        lister.load_catalog().await;

        lister.add_to_cart(ProductId::new(1)).await;

        assert_eq!(listener.inner.calls(), 1);
        assert!(toasts.drain().is_empty());
    }

    #[tokio::test]
    async fn unmount_discards_late_catalog() {
        let (mut lister, mut toasts, _) = lister(ScriptedTransport::new([Reply::Hang]));
        let token = lister.lifetime().token();

        tokio::join!(lister.load_catalog(), async move { token.cancel() });

        assert!(lister.state().data().is_none());
        assert!(lister.state().error().is_none());
        assert!(toasts.drain().is_empty());
    }
}
