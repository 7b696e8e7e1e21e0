use url::Url;

use crate::domain::error::{EngineError, EngineResult};

/// Checks a classifier base URL: it must parse, use http or https, and name
/// a host. Loopback and private hosts are allowed; the default backend runs
/// on localhost.
pub fn validate_base_url(url_str: &str) -> EngineResult<Url> {
  if url_str.trim().is_empty() {
    return Err(EngineError::Config("API base URL is empty".into()));
  }
  let url = Url::parse(url_str)
    .map_err(|e| EngineError::Config(format!("invalid API base URL '{url_str}': {e}")))?;
  match url.scheme() {
    "http" | "https" => {}
    other => {
      return Err(EngineError::Config(format!("unsupported URL scheme '{other}'")));
    }
  }
  if url.host_str().map_or(true, str::is_empty) {
    return Err(EngineError::Config("URL missing host".into()));
  }
  if url.query().is_some() || url.fragment().is_some() {
    return Err(EngineError::Config("API base URL must not carry a query or fragment".into()));
  }
  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_local_and_remote_http() {
    assert!(validate_base_url("http://localhost:8000").is_ok());
    assert!(validate_base_url("http://127.0.0.1:8000/").is_ok());
    assert!(validate_base_url("https://detect.example.com/api").is_ok());
  }

  #[test]
  fn rejects_bad_urls() {
    for bad in ["", "localhost:8000", "ftp://example.com", "http://", "https://h/?x=1", "not a url"] {
      let err = validate_base_url(bad).unwrap_err();
      assert!(matches!(err, EngineError::Config(_)), "{bad}: {err}");
    }
  }
}
