//! Migration types and the divergence planner.

pub mod errors;
pub mod plan;
pub mod types;

pub use errors::*;
pub use plan::*;
pub use types::*;
