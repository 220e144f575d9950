//! Navigation shell: routes between the three views and owns the badge.

use std::fmt::Write as _;
use std::sync::Arc;

use shop_core::ShopClient;
use tracing::{debug, instrument};

use crate::badge::{CartBadge, CartListener};
use crate::cart::CartSynchronizer;
use crate::notify::Toaster;
use crate::products::ProductLister;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Cart,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/products" => Some(Route::Products),
            "/cart" => Some(Route::Cart),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Products => "/products",
            Route::Cart => "/cart",
        }
    }
}

/// The currently mounted view.
pub enum View {
    Home,
    Products(ProductLister),
    Cart(CartSynchronizer),
}

impl View {
    fn unmount(&self) {
        match self {
            View::Home => {}
            View::Products(lister) => lister.unmount(),
            View::Cart(cart) => cart.unmount(),
        }
    }

    fn render(&self) -> String {
        match self {
            View::Home => "Welcome to My Shop\nBrowse our products and fill your cart.\n".to_string(),
            View::Products(lister) => lister.render(),
            View::Cart(cart) => cart.render(),
        }
    }
}

pub struct Shell {
    client: ShopClient,
    transport: Arc<dyn Transport>,
    toaster: Toaster,
    badge: Arc<CartBadge>,
    route: Option<Route>,
    view: Option<View>,
}

impl Shell {
    pub fn new(client: ShopClient, transport: Arc<dyn Transport>, toaster: Toaster) -> Self {
        let badge = Arc::new(CartBadge::new(client.clone(), transport.clone(), toaster.clone()));
        Self {
            client,
            transport,
            toaster,
            badge,
            route: None,
            view: None,
        }
    }

    /// Initial badge fetch, done once when the shell comes up.
    pub async fn start(&self) {
        self.badge.refresh().await;
    }

    /// Unmount the current view, mount the one for `route` and run its
    /// initial load.
    #[instrument(skip(self))]
    pub async fn navigate(&mut self, route: Route) {
        if let Some(view) = self.view.take() {
            view.unmount();
        }
        debug!(path = route.path(), "mounting view");
        let listener: Arc<dyn CartListener> = self.badge.clone();
        let mut view = match route {
            Route::Home => View::Home,
            Route::Products => View::Products(ProductLister::new(
                self.client.clone(),
                self.transport.clone(),
                self.toaster.clone(),
                listener,
            )),
            Route::Cart => View::Cart(CartSynchronizer::new(
                self.client.clone(),
                self.transport.clone(),
                self.toaster.clone(),
                listener,
            )),
        };
        match &mut view {
            View::Home => {}
            View::Products(lister) => lister.load_catalog().await,
            View::Cart(cart) => cart.load_cart().await,
        }
        self.route = Some(route);
        self.view = Some(view);
    }

    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn products_mut(&mut self) -> Option<&mut ProductLister> {
        match self.view.as_mut()? {
            View::Products(lister) => Some(lister),
            _ => None,
        }
    }

    pub fn cart_mut(&mut self) -> Option<&mut CartSynchronizer> {
        match self.view.as_mut()? {
            View::Cart(cart) => Some(cart),
            _ => None,
        }
    }

    pub fn badge(&self) -> &CartBadge {
        &self.badge
    }

    pub fn render(&self) -> String {
        let mut out = String::from("My Shop\n");
        let _ = writeln!(out, "Home | Products | Cart ({})", self.badge.count());
        out.push('\n');
        if let Some(view) = &self.view {
            out.push_str(&view.render());
        }
        out.push_str("\n(c) 2024 My Shop. All rights reserved.\n");
        out
    }
}
