use thiserror::Error;

use crate::error::StoreError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Store(#[from] StoreError),
}
