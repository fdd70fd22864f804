use serde::{Deserialize, Serialize};

/// Identifies one of the evidence guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardName {
    Citation,
    Numeric,
    Temporal,
    Staleness,
    Disambiguation,
    Language,
}

impl GuardName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citation => "citation",
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Staleness => "staleness",
            Self::Disambiguation => "disambiguation",
            Self::Language => "language",
        }
    }

    /// Fatal guards flip the overall decision when they fail; advisory ones
    /// only adjust confidence or attach structured detail.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Citation | Self::Numeric | Self::Temporal | Self::Staleness
        )
    }
}

impl std::fmt::Display for GuardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one guard over one answer candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardOutcome {
    pub guard: GuardName,
    pub passed: bool,
    /// Human-readable explanation of the result.
    pub reason: String,
    /// Structured detail for callers that need more than the reason text
    /// (e.g. missing numeric values, disambiguation options).
    pub detail: Option<serde_json::Value>,
}

impl GuardOutcome {
    pub fn pass(guard: GuardName, reason: impl Into<String>) -> Self {
        Self {
            guard,
            passed: true,
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn fail(guard: GuardName, reason: impl Into<String>) -> Self {
        Self {
            guard,
            passed: false,
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Short reason code used in pipeline responses, e.g. `citation: Answer
    /// lacks any source citations`.
    pub fn reason_code(&self) -> String {
        format!("{}: {}", self.guard, self.reason)
    }
}
