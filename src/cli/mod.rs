pub mod commands;
pub mod context;
pub mod health;
pub mod scan;
pub mod jobs;
pub mod emails;
pub mod doctor;

pub use commands::{Cli, Commands};
pub use context::AppContext;
