pub mod errors;
pub mod tally;

pub use errors::*;
pub use tally::*;
