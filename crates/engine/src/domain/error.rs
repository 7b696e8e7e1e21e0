// crates/engine/src/domain/error.rs
use thiserror::Error;

/// Fallback description when a failure carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred";
/// Description shown for any 2xx response the client cannot interpret.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

#[derive(Debug, Error)]
pub enum EngineError {
  /// Rejected locally before anything is sent. Carries the user-facing text.
  #[error("validation: {0}")]
  Validation(String),

  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// 2xx response with a malformed body or a missing/unrecognized label.
  #[error("protocol: {0}")]
  Protocol(String),

  /// No response was obtained.
  #[error("transport: {0}")]
  Transport(String),

  #[error("configuration: {0}")]
  Config(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl EngineError {
  /// Text suitable for a notification description.
  pub fn user_message(&self) -> String {
    match self {
      EngineError::Validation(msg) | EngineError::Config(msg) => msg.clone(),
      EngineError::Server { status, message } => {
        if message.trim().is_empty() {
          format!("Server error ({status})")
        } else {
          message.clone()
        }
      }
      EngineError::Protocol(_) => INVALID_RESPONSE_MESSAGE.to_string(),
      EngineError::Transport(msg) => {
        if msg.trim().is_empty() {
          GENERIC_FAILURE_MESSAGE.to_string()
        } else {
          msg.clone()
        }
      }
      EngineError::Io(e) => e.to_string(),
    }
  }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for EngineError {
  fn from(value: reqwest::Error) -> Self {
    Self::Transport(value.to_string())
  }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_error_falls_back_to_status() {
    let e = EngineError::Server { status: 502, message: "  ".into() };
    assert_eq!(e.user_message(), "Server error (502)");
    let e = EngineError::Server { status: 500, message: "model unavailable".into() };
    assert_eq!(e.user_message(), "model unavailable");
  }

  #[test]
  fn protocol_error_is_generic_for_users() {
    let e = EngineError::Protocol("missing label".into());
    assert_eq!(e.user_message(), INVALID_RESPONSE_MESSAGE);
    assert!(e.to_string().contains("missing label"));
  }

  #[test]
  fn io_error_uses_its_own_text() {
    let e = EngineError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "preview dir is read-only"));
    assert_eq!(e.user_message(), "preview dir is read-only");
  }

  #[test]
  fn empty_transport_error_uses_generic_text() {
    assert_eq!(EngineError::Transport(String::new()).user_message(), GENERIC_FAILURE_MESSAGE);
  }
}
