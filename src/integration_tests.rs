#[cfg(test)]
mod tests {
    use crate::app_system::{StoreConfig, StorefrontSystem};
    use crate::backends::{KeyValueStore, MemoryStore};
    use crate::cart::CART_KEY;
    use crate::clients::Landing;
    use crate::collection::ConflictPolicy;
    use crate::domain::{CartItem, Registration, Role, User};
    use crate::error::StoreError;
    use crate::user::{CURRENT_USER_KEY, USERS_KEY};

    #[tokio::test]
    async fn test_shopping_flow() {
        let system = StorefrontSystem::start(&StoreConfig::default()).unwrap();

        // Registration then login
        let registered = system
            .user_client
            .register(Registration::new("Ana", "Li", "a@x.com", "Pass1234"))
            .await
            .unwrap();
        let outcome = system.user_client.login("a@x.com", "Pass1234").await.unwrap();
        assert_eq!(outcome.user, registered);
        assert_eq!(outcome.landing, Landing::Home);

        // Cart total
        system.cart_client.add_to_cart("Pen", 10.0, "p.png").await.unwrap();
        system.cart_client.add_to_cart("Book", 25.0, "b.png").await.unwrap();
        let cart: Vec<CartItem> = system.collections().load(CART_KEY).await.unwrap();
        let total: f64 = cart.iter().map(|item| item.price).sum();
        assert_eq!(total, 35.0);

        // Purchase all clears the cart
        let receipt = system.cart_client.purchase_all().await.unwrap();
        assert_eq!(receipt.total, 35.0);
        assert!(system.collections().load::<CartItem>(CART_KEY).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            store_dir: Some(dir.path().to_path_buf()),
            ..StoreConfig::default()
        };

        let system = StorefrontSystem::start(&config).unwrap();
        system
            .user_client
            .register(Registration::new("Ana", "Li", "a@x.com", "Pass1234"))
            .await
            .unwrap();
        system.user_client.login("a@x.com", "Pass1234").await.unwrap();
        system.cart_client.add_to_cart("Pen", 10.0, "p.png").await.unwrap();
        system.shutdown().await.unwrap();

        let users_text = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
        assert!(users_text.contains(r#""role":"user""#));
        assert!(dir.path().join("currentUser.json").exists());

        let system = StorefrontSystem::start(&config).unwrap();
        assert_eq!(system.cart_client.total().await.unwrap(), 10.0);
        let current = system.user_client.current_user().await.unwrap().unwrap();
        assert_eq!(current.email, "a@x.com");
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_records_written_without_ids_are_usable() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                USERS_KEY,
                r#"[{"name":"Root","surname":"Admin","email":"root@x.com","password":"Secret99","role":"admin"}]"#,
            )
            .unwrap();
        backend
            .set(CART_KEY, r#"[{"name":"Pen","price":10,"image":"p.png"}]"#)
            .unwrap();
        let system = StorefrontSystem::with_backend(&StoreConfig::default(), backend);

        let outcome = system.user_client.login("root@x.com", "Secret99").await.unwrap();
        assert_eq!(outcome.landing, Landing::AdminPanel);
        assert_eq!(outcome.user.role, Role::Admin);

        let saved: Option<User> = system.collections().load_value(CURRENT_USER_KEY).await.unwrap();
        assert_eq!(saved.map(|u| u.email).as_deref(), Some("root@x.com"));

        let bought = system.cart_client.purchase_item(0).await.unwrap();
        assert_eq!(bought.price, 10.0);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_cart_surfaces_to_the_page() {
        let backend = MemoryStore::new().with_entry(CART_KEY, "[{\"name\":");
        let system = StorefrontSystem::with_backend(&StoreConfig::default(), backend);

        let err = system.cart_client.total().await.unwrap_err();
        assert!(matches!(
            err,
            crate::cart::CartError::Store(StoreError::CorruptData { .. })
        ));

        // Clearing is still possible and recovers the page.
        system.cart_client.clear().await.unwrap();
        assert_eq!(system.cart_client.total().await.unwrap(), 0.0);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_cart_file_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cart.json"), [0xff, 0xfe, b'[']).unwrap();
        let config = StoreConfig {
            store_dir: Some(dir.path().to_path_buf()),
            ..StoreConfig::default()
        };
        let system = StorefrontSystem::start(&config).unwrap();

        let err = system.cart_client.total().await.unwrap_err();
        assert!(matches!(
            err,
            crate::cart::CartError::Store(StoreError::CorruptData { .. })
        ));

        system.cart_client.clear().await.unwrap();
        assert_eq!(system.cart_client.total().await.unwrap(), 0.0);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_two_pages_under_reject_stale() {
        let config = StoreConfig {
            conflict_policy: ConflictPolicy::RejectStale,
            ..StoreConfig::default()
        };
        let system = StorefrontSystem::start(&config).unwrap();
        let admin_page = system.collections();
        let other_page = system.collections();

        for name in ["Ana", "Bob"] {
            system
                .user_client
                .register(Registration::new(name, "S", format!("{}@x.com", name), "Pass1234"))
                .await
                .unwrap();
        }

        let snapshot = admin_page.snapshot::<User>(USERS_KEY).await.unwrap();
        other_page.remove_at::<User>(USERS_KEY, 0).await.unwrap();

        let err = admin_page.remove_at_checked(&snapshot, 1).await.unwrap_err();
        assert_eq!(err, StoreError::Stale { key: USERS_KEY.to_string() });

        let remaining = system.user_client.list_users("").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user.name, "Bob");

        system.shutdown().await.unwrap();
    }
}
