//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wishlist_core` linkage without a UI host.
//! - Run one seed/toggle/refresh cycle against an in-memory store.

use std::process::ExitCode;
use wishlist_core::WishlistApp;

fn main() -> ExitCode {
    println!("wishlist_core ping={}", wishlist_core::ping());
    println!("wishlist_core version={}", wishlist_core::core_version());

    match run_cycle() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wishlist_core cycle failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = WishlistApp::open_in_memory()?;
    app.ensure_schema()?;

    let report = app.seed_initial_data()?;
    app.bump_refresh();
    println!(
        "seed products={} wishlist={:?} failures={}",
        report.product_ids.len(),
        report.wishlist_id,
        report.failures.len()
    );

    let snapshot = app.snapshot()?;
    if let (Some(wishlist), Some(product)) = (snapshot.wishlist.as_ref(), snapshot.products.first())
    {
        let outcome =
            app.toggle_membership(wishlist.id, product.id, snapshot.contains(product.id))?;
        app.bump_refresh();
        println!("toggle product={} outcome={outcome:?}", product.id);
    }

    let refreshed = app.snapshot()?;
    println!(
        "refresh token={} products={} items={}",
        app.refresh_token(),
        refreshed.products.len(),
        refreshed.items.len()
    );

    app.close()?;
    Ok(())
}
