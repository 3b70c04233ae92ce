use tracing::{info, instrument, warn};

use crate::cart::{CartError, CART_KEY};
use crate::collection::Collections;
use crate::domain::{CartItem, Receipt};

fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

/// Client backing the product pages ("add to cart") and the cart page.
#[derive(Clone, Debug)]
pub struct CartClient {
    inner: Collections,
}

impl_client_new!(CartClient);

impl CartClient {
    #[instrument(skip(self, name, image), fields(item_name = %name))]
    pub async fn add_to_cart(
        &self,
        name: &str,
        price: f64,
        image: &str,
    ) -> Result<CartItem, CartError> {
        let item = CartItem::new(name, price, image);
        self.inner.append(CART_KEY, item.clone()).await?;
        info!(item_id = %item.id, "Added to cart");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Vec<CartItem>, CartError> {
        Ok(self.inner.load(CART_KEY).await?)
    }

    /// Sum of the prices of everything in the cart.
    #[instrument(skip(self))]
    pub async fn total(&self) -> Result<f64, CartError> {
        let items = self.items().await?;
        Ok(cart_total(&items))
    }

    /// Buys the item at `index`, removing it from the cart.
    #[instrument(skip(self))]
    pub async fn purchase_item(&self, index: usize) -> Result<CartItem, CartError> {
        let item: CartItem = self.inner.remove_at(CART_KEY, index).await?;
        info!(item_name = %item.name, price = item.price, "Item purchased");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, index: usize) -> Result<CartItem, CartError> {
        let item: CartItem = self.inner.remove_at(CART_KEY, index).await?;
        info!(item_name = %item.name, "Item removed from cart");
        Ok(item)
    }

    /// Buys everything and empties the cart. An empty cart is an error and
    /// leaves the store untouched.
    #[instrument(skip(self))]
    pub async fn purchase_all(&self) -> Result<Receipt, CartError> {
        let items = self.items().await?;
        if items.is_empty() {
            warn!("Nothing to purchase");
            return Err(CartError::EmptyCart);
        }

        let total = cart_total(&items);
        self.inner.clear(CART_KEY).await?;

        info!(count = items.len(), total, "Purchased all items");
        Ok(Receipt { items, total })
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        self.inner.clear(CART_KEY).await?;
        Ok(())
    }
}
