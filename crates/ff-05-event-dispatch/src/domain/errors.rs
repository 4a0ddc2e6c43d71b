use ff_03_vote_tally::TallyError;
use ff_04_app_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Tally error: {0}")]
    Tally(#[from] TallyError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Dispatch inbox closed")]
    InboxClosed,
}
