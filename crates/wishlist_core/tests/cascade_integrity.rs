use wishlist_core::repo::product_repo::{ProductRepository, SqliteProductRepository};
use wishlist_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use wishlist_core::repo::wishlist_repo::{SqliteWishlistRepository, WishlistRepository};
use wishlist_core::{RepoError, WishlistApp};

struct Filled {
    app: WishlistApp,
    user_id: i64,
    wishlist_id: i64,
    product_ids: Vec<i64>,
}

fn filled() -> Filled {
    let mut app = WishlistApp::open_in_memory().unwrap();
    app.ensure_schema().unwrap();
    let report = app.seed_initial_data().unwrap();
    let wishlist_id = report.wishlist_id.unwrap();
    for product_id in &report.product_ids {
        app.toggle_membership(wishlist_id, *product_id, false)
            .unwrap();
    }
    Filled {
        user_id: report.user_id.unwrap(),
        wishlist_id,
        product_ids: report.product_ids,
        app,
    }
}

fn item_count(app: &WishlistApp) -> i64 {
    app.store()
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM wishlist_items;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn deleting_a_wishlist_removes_its_items() {
    let filled = filled();
    assert_eq!(item_count(&filled.app), 3);

    let conn = filled.app.store().ready_connection().unwrap();
    SqliteWishlistRepository::new(conn)
        .delete_wishlist(filled.wishlist_id)
        .unwrap();

    assert_eq!(item_count(&filled.app), 0);
    assert_eq!(filled.app.list_products().unwrap().len(), 3);
}

#[test]
fn deleting_a_product_removes_items_referencing_it() {
    let filled = filled();
    let removed = filled.product_ids[1];

    let conn = filled.app.store().ready_connection().unwrap();
    SqliteProductRepository::new(conn)
        .delete_product(removed)
        .unwrap();

    let items = filled.app.list_wishlist_items(filled.wishlist_id).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.product_id != removed));
}

#[test]
fn deleting_the_owner_removes_wishlists_and_their_items() {
    let filled = filled();

    let conn = filled.app.store().ready_connection().unwrap();
    SqliteUserRepository::new(conn)
        .delete_user(filled.user_id)
        .unwrap();

    assert!(filled.app.active_wishlist().unwrap().is_none());
    assert_eq!(item_count(&filled.app), 0);
    assert!(filled.app.seed_available().unwrap());
}

#[test]
fn deleting_a_missing_row_is_not_found() {
    let filled = filled();
    let conn = filled.app.store().ready_connection().unwrap();

    let err = SqliteWishlistRepository::new(conn)
        .delete_wishlist(filled.wishlist_id + 100)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "wishlists",
            ..
        }
    ));
}
