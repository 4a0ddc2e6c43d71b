pub mod config;
pub mod errors;
pub mod throttle;

pub use config::*;
pub use errors::*;
pub use throttle::*;
