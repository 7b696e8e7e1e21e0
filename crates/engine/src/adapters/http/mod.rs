// HTTP adapter for the remote `/predict` service.

mod client;
mod wire;

pub use client::*;
pub use wire::*;
