use ff_01_durable_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Category {0} is out of range")]
    CategoryOutOfRange(i64),
}
