pub mod poller;

pub use poller::{HealthPoller, PollOutcome};
