//! Cart records and their errors.

pub mod entity;
pub mod error;

pub use error::*;

/// Collection holding the cart of the current origin.
pub const CART_KEY: &str = "cart";
