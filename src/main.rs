use tracing::{error, info, Instrument};

use local_storefront::app_system::{setup_tracing, StoreConfig, StorefrontSystem};
use local_storefront::cart::CartError;
use local_storefront::clients::CartClient;
use local_storefront::domain::{Receipt, Registration};

async fn shop(cart: &CartClient) -> Result<Receipt, CartError> {
    cart.add_to_cart("Pen", 10.0, "p.png").await?;
    cart.add_to_cart("Book", 25.0, "b.png").await?;
    let total = cart.total().await?;
    info!(total, "Cart ready");
    cart.purchase_all().await
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StoreConfig::from_env().map_err(|e| e.to_string())?;
    info!(policy = %config.conflict_policy, "Starting storefront demo");

    let system = StorefrontSystem::start(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("registration");
    async {
        let form = Registration::new("Ana", "Li", "a@x.com", "Pass1234");
        match system.user_client.register(form).await {
            Ok(user) => info!(user_id = %user.id, "Registered demo user"),
            Err(e) => error!(error = %e, "Registration failed"),
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("login");
    let outcome = async { system.user_client.login("a@x.com", "Pass1234").await }
        .instrument(span)
        .await
        .map_err(|e| e.to_string())?;
    info!(user_name = %outcome.user.name, landing = ?outcome.landing, "Logged in");

    let span = tracing::info_span!("shopping");
    let receipt = shop(&system.cart_client).instrument(span).await;

    match receipt {
        Ok(receipt) => info!(items = receipt.items.len(), total = receipt.total, "Purchase complete"),
        Err(e) => error!(error = %e, "Purchase failed"),
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
