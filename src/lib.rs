//! # Local Storefront
//!
//! The persistence layer of a small storefront that keeps everything in an
//! origin-scoped key-value medium: registered users, the shopping cart and
//! the currently logged-in user.
//!
//! ## Layers
//!
//! - **Media** - text-in, text-out [`backends::KeyValueStore`] implementations → [`backends::MemoryStore`], [`backends::FileStore`]
//! - **Store actor** - one task owns the medium, pages hold cloneable handles → [`actor_framework::StoreActor`], [`actor_framework::StoreClient`]
//! - **Collections** - typed load/save/append/remove/replace/clear/find over named JSON arrays → [`collection::Collections`]
//! - **Page clients** - registration, login, admin table and cart → [`clients::UserClient`], [`clients::CartClient`]
//! - **System** - startup, config and tracing → [`app_system::StorefrontSystem`], [`app_system::StoreConfig`], [`app_system::setup_tracing`]
//!
//! ## Example Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use local_storefront::app_system::{StoreConfig, StorefrontSystem};
//! use local_storefront::domain::Registration;
//!
//! let system = StorefrontSystem::start(&StoreConfig::from_env()?)?;
//!
//! system.user_client.register(Registration::new("Ana", "Li", "a@x.com", "Pass1234")).await?;
//! system.user_client.login("a@x.com", "Pass1234").await?;
//! system.cart_client.add_to_cart("Pen", 10.0, "p.png").await?;
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod backends;
pub mod cart;
pub mod clients;
pub mod collection;
pub mod domain;
pub mod error;
pub mod user;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
