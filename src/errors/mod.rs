pub mod types;
pub mod classification;

pub use types::{AccessiscanError, NETWORK_ERROR_MESSAGE};
pub use classification::ErrorClassification;
