use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::error::{EngineError, EngineResult};
use crate::domain::types::{Label, Verdict};

/// Body of a 2xx `/predict` response. Both fields are optional on the wire;
/// a missing label is rejected by [`parse_prediction`].
#[derive(Debug, Deserialize)]
struct PredictBody {
  #[serde(default)]
  label: Option<Value>,
  #[serde(default)]
  score: Option<Value>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
  pub status: String,
  #[serde(default)]
  pub device: Option<String>,
}

impl HealthStatus {
  pub fn is_ok(&self) -> bool {
    self.status.eq_ignore_ascii_case("ok")
  }
}

/// Turns a 2xx body into a verdict.
///
/// The label must be `"real"` or `"fake"`. A score that is not a number in
/// [0, 1] is dropped rather than failing the whole response.
pub fn parse_prediction(body: &str) -> EngineResult<Verdict> {
  let parsed: PredictBody = serde_json::from_str(body)
    .map_err(|e| EngineError::Protocol(format!("malformed prediction body: {e}")))?;

  let label = match parsed.label {
    Some(Value::String(s)) => Label::from_wire(&s)
      .ok_or_else(|| EngineError::Protocol(format!("unrecognized label '{s}'")))?,
    Some(other) => return Err(EngineError::Protocol(format!("label is not a string: {other}"))),
    None => return Err(EngineError::Protocol("missing label".into())),
  };

  let score = match parsed.score {
    None | Some(Value::Null) => None,
    Some(v) => match v.as_f64() {
      Some(s) if (0.0..=1.0).contains(&s) => Some(s),
      _ => {
        warn!(score = %v, "ignoring score outside [0, 1]");
        None
      }
    },
  };

  Ok(Verdict::new(label, score))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_label_and_score() {
    let v = parse_prediction(r#"{"label":"real","score":0.92}"#).unwrap();
    assert_eq!(v, Verdict::new(Label::Authentic, Some(0.92)));
    let v = parse_prediction(r#"{"label":"fake"}"#).unwrap();
    assert_eq!(v, Verdict::new(Label::Synthetic, None));
  }

  #[test]
  fn label_is_required_and_closed() {
    for body in [r#"{}"#, r#"{"score":0.5}"#, r#"{"label":"maybe"}"#, r#"{"label":1}"#, "null", "", "<html>"] {
      let err = parse_prediction(body).unwrap_err();
      assert!(matches!(err, EngineError::Protocol(_)), "{body:?} -> {err}");
    }
  }

  #[test]
  fn odd_scores_are_dropped() {
    for body in [
      r#"{"label":"real","score":"0.9"}"#,
      r#"{"label":"real","score":1.5}"#,
      r#"{"label":"real","score":-0.1}"#,
      r#"{"label":"real","score":null}"#,
    ] {
      assert_eq!(parse_prediction(body).unwrap().score, None, "{body}");
    }
  }

  #[test]
  fn health_body() {
    let h: HealthStatus = serde_json::from_str(r#"{"status":"ok","device":"cpu"}"#).unwrap();
    assert!(h.is_ok());
    assert_eq!(h.device.as_deref(), Some("cpu"));
  }
}
