use wishlist_core::db::{ensure_schema, open_store_in_memory};
use wishlist_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use wishlist_core::repo::wishlist_repo::{SqliteWishlistRepository, WishlistRepository};
use wishlist_core::{NewUser, NewWishlist, QueryService, RepoError, WishlistApp};

#[test]
fn active_wishlist_is_the_highest_key() {
    let mut store = open_store_in_memory().unwrap();
    ensure_schema(&mut store).unwrap();
    {
        let conn = store.ready_connection().unwrap();
        let owner = SqliteUserRepository::new(conn)
            .create_user(&NewUser::new("Ada", "Lovelace", "ada@example.com"))
            .unwrap();
        let wishlists = SqliteWishlistRepository::new(conn);
        for (title, creation_date) in [("one", 30), ("two", 20), ("three", 10)] {
            wishlists
                .create_wishlist(&NewWishlist {
                    owner_id: owner,
                    title: title.to_string(),
                    creation_date,
                })
                .unwrap();
        }
        assert_eq!(wishlists.list_wishlists().unwrap().len(), 3);
    }

    let active = QueryService::new(&store).active_wishlist().unwrap().unwrap();
    assert_eq!(active.id, 3);
    assert_eq!(active.title, "three");
}

#[test]
fn empty_store_reads_are_empty_not_errors() {
    let mut app = WishlistApp::open_in_memory().unwrap();
    app.ensure_schema().unwrap();

    assert!(app.list_products().unwrap().is_empty());
    assert!(app.active_wishlist().unwrap().is_none());
    assert!(app.list_wishlist_items(42).unwrap().is_empty());

    let snapshot = app.snapshot().unwrap();
    assert!(snapshot.products.is_empty());
    assert!(snapshot.wishlist.is_none());
    assert!(snapshot.items.is_empty());
    assert!(snapshot.seed_available());
}

#[test]
fn out_of_range_quantity_is_reported_not_truncated() {
    let mut app = WishlistApp::open_in_memory().unwrap();
    app.ensure_schema().unwrap();
    app.store()
        .connection()
        .unwrap()
        .execute(
            "INSERT INTO products (title, description, quantity) VALUES ('Huge', 'Overflow', ?1);",
            [5_000_000_000_i64],
        )
        .unwrap();

    let err = app.list_products().unwrap_err();
    match err {
        RepoError::InvalidData(message) => {
            assert!(message.contains("5000000000"), "message: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(app.snapshot(), Err(RepoError::InvalidData(_))));
}

#[test]
fn snapshot_uses_wishlist_resolved_in_the_same_pass() {
    let mut app = WishlistApp::open_in_memory().unwrap();
    app.ensure_schema().unwrap();
    let report = app.seed_initial_data().unwrap();
    let first_product = report.product_ids[0];

    let snapshot = app.snapshot().unwrap();
    let wishlist_id = snapshot.wishlist.as_ref().unwrap().id;
    app.toggle_membership(wishlist_id, first_product, snapshot.contains(first_product))
        .unwrap();

    let refreshed = app.snapshot().unwrap();
    assert_eq!(refreshed.items.len(), 1);
    assert!(refreshed.items.iter().all(|item| item.wishlist_id == wishlist_id));
    assert!(refreshed.contains(first_product));
}

#[test]
fn seed_toggle_refresh_scenario() {
    let mut app = WishlistApp::open_in_memory().unwrap();
    app.ensure_schema().unwrap();
    let mut seen = None;
    app.refresh_if_changed(&mut seen).unwrap();

    assert!(app.seed_available().unwrap());
    app.seed_initial_data().unwrap();
    app.bump_refresh();

    let products = app.list_products().unwrap();
    let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Produit1", "Produit2", "Produit3"]);
    assert!(products.iter().all(|p| p.quantity == 100));

    let wishlist = app.active_wishlist().unwrap().unwrap();
    assert!(app.list_wishlist_items(wishlist.id).unwrap().is_empty());

    let product1 = products[0].id;
    app.toggle_membership(wishlist.id, product1, false).unwrap();
    app.bump_refresh();
    let items = app.list_wishlist_items(wishlist.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, product1);

    let snapshot = app.refresh_if_changed(&mut seen).unwrap().unwrap();
    assert!(snapshot.contains(product1));
    assert_eq!(seen, Some(2));

    app.toggle_membership(wishlist.id, product1, true).unwrap();
    app.bump_refresh();
    assert!(app.list_wishlist_items(wishlist.id).unwrap().is_empty());

    let snapshot = app.refresh_if_changed(&mut seen).unwrap().unwrap();
    assert!(snapshot.member_product_ids().is_empty());
}
