// Adapters: concrete implementations of the domain seams.

pub mod content_detection;
pub mod notify;
pub mod preview_store;
pub mod scripted;
pub mod url_validation;

#[cfg(feature = "http")]
pub mod http;
