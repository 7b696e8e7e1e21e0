use serde::{Deserialize, Serialize};

/// Label returned by the remote classifier. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "real")]
    Authentic,
    #[serde(rename = "fake")]
    Synthetic,
}

impl Label {
    /// Wire spelling used by the prediction endpoint.
    pub fn as_wire(self) -> &'static str {
        match self {
            Label::Authentic => "real",
            Label::Synthetic => "fake",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "real" => Some(Label::Authentic),
            "fake" => Some(Label::Synthetic),
            _ => None,
        }
    }
}

/// Outcome of a completed detection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    /// Confidence for `label`, within [0.0, 1.0].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Verdict {
    pub fn new(label: Label, score: Option<f64>) -> Self {
        Self { label, score }
    }

    /// Score as a whole percentage, rounded half up.
    pub fn confidence_percent(&self) -> Option<u32> {
        self.score.map(|s| (s * 100.0).round() as u32)
    }

    /// Banner heading keyed by label.
    pub fn headline(&self) -> &'static str {
        match self.label {
            Label::Authentic => "✅ This image appears authentic",
            Label::Synthetic => "⚠️ This image may be AI-generated",
        }
    }

    /// Banner body keyed by label, with the confidence when known.
    pub fn summary(&self) -> String {
        let base = match self.label {
            Label::Authentic => "Our AI analysis suggests this image is likely genuine.",
            Label::Synthetic => "Our AI analysis detected potential signs of manipulation.",
        };
        match self.confidence_percent() {
            Some(pct) => format!("{base} Confidence: {pct}%"),
            None => base.to_string(),
        }
    }
}

/// Observable phase of the detection workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Idle,
    FileSelected,
    Submitting,
    Completed,
    Failed,
}

impl Phase {
    /// Phases from which a submission may start.
    pub fn can_submit(self) -> bool {
        matches!(self, Phase::FileSelected | Phase::Completed | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::FileSelected => "file selected",
            Phase::Submitting => "analyzing",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_like_the_banner() {
        assert_eq!(Verdict::new(Label::Authentic, Some(0.92)).confidence_percent(), Some(92));
        assert_eq!(Verdict::new(Label::Authentic, Some(0.925)).confidence_percent(), Some(93));
        assert_eq!(Verdict::new(Label::Synthetic, Some(0.0)).confidence_percent(), Some(0));
        assert_eq!(Verdict::new(Label::Synthetic, None).confidence_percent(), None);
    }

    #[test]
    fn summary_appends_confidence_only_when_scored() {
        let v = Verdict::new(Label::Synthetic, Some(0.81));
        assert!(v.summary().ends_with("Confidence: 81%"));
        let v = Verdict::new(Label::Authentic, None);
        assert_eq!(v.summary(), "Our AI analysis suggests this image is likely genuine.");
    }

    #[test]
    fn wire_labels() {
        assert_eq!(Label::from_wire("real"), Some(Label::Authentic));
        assert_eq!(Label::from_wire("fake"), Some(Label::Synthetic));
        assert_eq!(Label::from_wire("Real"), None);
        assert_eq!(Label::Synthetic.as_wire(), "fake");
    }
}
