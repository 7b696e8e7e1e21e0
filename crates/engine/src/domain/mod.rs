pub mod classifier;
pub mod error;
pub mod notify;
pub mod preview;
pub mod types;
pub mod workflow;
