//! Page clients: the typed operations each storefront page performs against
//! the collection layer.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod user_client;

pub use cart_client::CartClient;
pub use user_client::{Landing, LoginOutcome, SortField, UserClient, UserRow};
