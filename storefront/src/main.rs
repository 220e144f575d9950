//! `storefront` - drives the shop views from the command line.
//!
//! Each invocation mounts the shell, performs one action against the API at
//! `STOREFRONT_API_BASE`, then prints the rendered page and any toasts.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use shop_core::{ProductId, ShopClient};
use shop_storefront::{notify, ReqwestTransport, Route, Shell, StorefrontConfig, ToastKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storefront", about = "Browse the shop and manage the cart")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a page by path: /, /products or /cart
    Open { path: String },
    /// Show the home page
    Home,
    /// List the catalog
    Products,
    /// Add one unit of a product to the cart
    Add { id: u64 },
    /// Show the cart
    Cart,
    /// Set the quantity of a cart line (0 removes it)
    Set { id: u64, quantity: String },
    /// Remove a cart line
    Remove { id: u64 },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StorefrontConfig::from_env()?;
    tracing::info!(api_base = %config.api_base, "starting storefront");

    let transport = Arc::new(ReqwestTransport::new()?);
    let (toaster, mut toasts) = notify::channel();
    let mut shell = Shell::new(ShopClient::new(config.api_base.as_str()), transport, toaster);
    shell.start().await;

    match cli.command {
        Command::Open { path } => {
            let route = Route::from_path(&path).ok_or_else(|| format!("no page at {path}"))?;
            shell.navigate(route).await;
        }
        Command::Home => shell.navigate(Route::Home).await,
        Command::Products => shell.navigate(Route::Products).await,
        Command::Add { id } => {
            shell.navigate(Route::Products).await;
            if let Some(lister) = shell.products_mut() {
                lister.add_to_cart(ProductId::new(id)).await;
            }
        }
        Command::Cart => shell.navigate(Route::Cart).await,
        Command::Set { id, quantity } => {
            shell.navigate(Route::Cart).await;
            if let Some(cart) = shell.cart_mut() {
                cart.set_line_quantity_input(ProductId::new(id), &quantity).await;
            }
        }
        Command::Remove { id } => {
            shell.navigate(Route::Cart).await;
            if let Some(cart) = shell.cart_mut() {
                cart.remove_line(ProductId::new(id)).await;
            }
        }
    }

    print!("{}", shell.render());
    for toast in toasts.drain() {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
        };
        println!("[{tag}] {}", toast.message);
    }
    Ok(())
}
