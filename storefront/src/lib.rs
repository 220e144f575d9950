//! Storefront views over the shop API.
//!
//! # Overview
//! Hosts the I/O for `shop-core`: a [`Transport`] executes the requests that
//! `ShopClient` builds, and the views turn the outcomes into view state and
//! toast notifications.
//!
//! # Design
//! - [`ProductLister`] and [`CartSynchronizer`] each own a [`ViewState`] and a
//!   [`ViewLifetime`]; a call that completes after the view is unmounted
//!   writes nothing.
//! - View operations take `&mut self`, so a view never has two calls in
//!   flight. A mutation is awaited before its follow-up read starts.
//! - Cart-mutating views notify a [`CartListener`] instead of touching the
//!   navigation badge; [`CartBadge`] re-derives its count from the server.
//! - Failures never escape a view: they are logged, toasted and, for reads,
//!   reflected in the view state.

pub mod badge;
pub mod cart;
pub mod config;
pub mod notify;
pub mod products;
pub mod shell;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use badge::{CartBadge, CartListener};
pub use cart::CartSynchronizer;
pub use config::{ConfigError, StorefrontConfig};
pub use notify::{Toast, ToastKind, Toaster, Toasts};
pub use products::ProductLister;
pub use shell::{Route, Shell, View};
pub use transport::{ReqwestTransport, Transport};
pub use view::{ViewLifetime, ViewState};
