use serde::{Deserialize, Serialize};

use crate::answer::SourceRef;

/// How the pipeline produced (or declined to produce) an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Rules,
    Rag,
    Fallback,
    Disambiguation,
}

impl AnswerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Rag => "rag",
            Self::Fallback => "fallback",
            Self::Disambiguation => "disambiguation",
        }
    }
}

/// The structured result handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub mode: AnswerMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    pub answer_text: String,
    pub sources: Vec<SourceRef>,
    pub confidence: f32,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation_options: Option<Vec<String>>,
}
