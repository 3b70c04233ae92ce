pub mod cart;
pub mod user;

pub use cart::*;
pub use user::*;
