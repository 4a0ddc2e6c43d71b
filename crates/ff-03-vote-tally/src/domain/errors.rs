use ff_01_durable_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Vote store failure: {0}")]
    Store(#[from] StoreError),
}
