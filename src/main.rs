//! MomBaby Storefront - terminal shop over the local cart and wishlist

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mombaby_storefront::catalog::CatalogQuery;
use mombaby_storefront::shell::{ClearTarget, Command};
use mombaby_storefront::{CartStore, Config, Storefront};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let mut shop = Storefront::open(&config);
    tracing::info!(
        cart_lines = shop.cart().items().len(),
        wishlist = shop.wishlist().total_items(),
        "🍼 MomBaby storefront ready"
    );
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        run(&mut shop, command).await;
    }
    tracing::info!("bye");
    Ok(())
}

async fn run(shop: &mut Storefront, command: Command) {
    let seen: Vec<_> = shop.toasts().toasts().into_iter().map(|t| t.id).collect();
    let show_all = command == Command::ShowToasts;
    match command {
        Command::Products(query) => print_products(shop, &query),
        Command::Add { id, quantity, size, color } => {
            if let Err(e) = shop.add_to_cart(id, size.as_deref(), color.as_deref(), quantity) {
                println!("{}", e.user_message());
            }
        }
        Command::Remove(id) => shop.remove_from_cart(id),
        Command::Quantity { id, quantity } => shop.update_quantity(id, quantity),
        Command::ShowCart => print_cart(shop.cart()),
        Command::OpenCart => shop.cart_mut().open_cart(),
        Command::CloseCart => shop.cart_mut().close_cart(),
        Command::ToggleCart => {
            shop.cart_mut().toggle_cart();
            println!("cart {}", if shop.cart().is_open() { "open" } else { "closed" });
        }
        Command::Wish(id) => {
            if let Err(e) = shop.toggle_wishlist(id) {
                println!("{}", e.user_message());
            }
        }
        Command::ShowWishlist => {
            for entry in shop.wishlist().items() {
                println!("#{:<3} {} - {}", entry.id, entry.name, entry.price);
            }
            println!("{} sản phẩm yêu thích", shop.wishlist().total_items());
        }
        Command::ShowToasts => {}
        Command::Checkout(request) => {
            println!("Đang xử lý...");
            if let Ok(order) = shop.checkout(request).await {
                let shipping = if order.shipping_fee.is_zero() { "Miễn phí".to_string() } else { order.shipping_fee.to_string() };
                println!("order {} ({} items)", order.id, order.item_count());
                println!(
                    "  {} ({}): {}",
                    order.shipping_method.label(),
                    order.shipping_method.delivery_window(),
                    shipping,
                );
                println!("  {}", order.payment_method.label());
                println!("  total {}", order.total);
            }
        }
        Command::Clear(ClearTarget::Cart) => shop.cart_mut().clear_cart(),
        Command::Clear(ClearTarget::Wishlist) => shop.wishlist_mut().clear_wishlist(),
        Command::Clear(ClearTarget::Toasts) => shop.toasts().clear_toasts(),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    shop.flush_notifications();
    for toast in shop.toasts().toasts().into_iter().filter(|t| show_all || !seen.contains(&t.id)) {
        println!("[{:?}] {} {}", toast.kind, toast.title, toast.message.unwrap_or_default());
    }
}

fn print_products(shop: &Storefront, query: &CatalogQuery) {
    let page = shop.catalog().browse(query);
    for p in &page.products {
        let saved = if shop.wishlist().is_in_wishlist(p.id) { "♥" } else { " " };
        let discount = p.discount_percent().map(|d| format!(" -{d}%")).unwrap_or_default();
        println!("{saved} #{:<3} {} ({}) {}{discount}", p.id, p.name, p.brand, p.unit_price());
        if !p.sizes.is_empty() {
            println!("       sizes: {}", p.sizes.join(", "));
        }
        if !p.colors.is_empty() {
            println!("       colors: {}", p.colors.join(", "));
        }
    }
    println!("page {}/{} ({} products)", page.page, page.total_pages.max(1), page.matched);
}

fn print_cart(cart: &CartStore) {
    for item in cart.items() {
        let variant: Vec<&str> = [item.selected_size.as_deref(), item.selected_color.as_deref()].into_iter().flatten().collect();
        println!("#{:<3} {} [{}] x{} = {}", item.id, item.name, variant.join(", "), item.quantity, item.line_total());
    }
    println!(
        "{} items, total {} ({})",
        cart.total_items(),
        CartStore::format_price(cart.total_price()),
        if cart.is_open() { "open" } else { "closed" },
    );
}

const HELP: &str = "\
products [page=N] [sort=popular|price-low|price-high|newest|rating] [category=..] [size=..] [search]
add <id> [qty] [size=..] [color=..]      remove <id>      qty <id> <n>
cart | open | close | toggle             wish <id>        wishlist      toasts
checkout <standard|express> <cod|banking|momo|zalopay> name|email|phone|address|city|district|ward[|notes]
clear [cart|wishlist|toasts]             help             quit";
