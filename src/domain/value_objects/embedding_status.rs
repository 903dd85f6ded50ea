use serde::{Deserialize, Serialize};

/// Processing state of an attached file. Transitions only move forward,
/// except `Failed`, which is reachable from any in-progress state and is
/// terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EmbeddingStatus {
    Pending,
    Queued,
    Embedding,
    Embedded,
    Failed(String),
}

impl EmbeddingStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EmbeddingStatus::Pending)
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, EmbeddingStatus::Queued)
    }

    pub fn is_embedding(&self) -> bool {
        matches!(self, EmbeddingStatus::Embedding)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, EmbeddingStatus::Embedded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EmbeddingStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EmbeddingStatus::Embedded | EmbeddingStatus::Failed(_))
    }

    pub fn can_transition_to(&self, new_status: &EmbeddingStatus) -> bool {
        match (self, new_status) {
            (EmbeddingStatus::Pending, EmbeddingStatus::Queued) => true,
            (EmbeddingStatus::Queued, EmbeddingStatus::Embedding) => true,
            (EmbeddingStatus::Embedding, EmbeddingStatus::Embedded) => true,
            // Failure is reachable from any in-progress state.
            (EmbeddingStatus::Pending, EmbeddingStatus::Failed(_)) => true,
            (EmbeddingStatus::Queued, EmbeddingStatus::Failed(_)) => true,
            (EmbeddingStatus::Embedding, EmbeddingStatus::Failed(_)) => true,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            EmbeddingStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingStatus::Pending => "pending",
            EmbeddingStatus::Queued => "queued",
            EmbeddingStatus::Embedding => "embedding",
            EmbeddingStatus::Embedded => "embedded",
            EmbeddingStatus::Failed(_) => "failed",
        }
    }

    /// Rebuild a status from its persisted form. The failure reason is stored
    /// in a separate column, so it is supplied alongside the tag.
    pub fn from_parts(s: &str, error: Option<String>) -> Result<Self, String> {
        match s {
            "pending" => Ok(EmbeddingStatus::Pending),
            "queued" => Ok(EmbeddingStatus::Queued),
            "embedding" => Ok(EmbeddingStatus::Embedding),
            "embedded" => Ok(EmbeddingStatus::Embedded),
            "failed" => Ok(EmbeddingStatus::Failed(
                error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            _ => Err(format!("Invalid embedding status: {}", s)),
        }
    }
}

impl Default for EmbeddingStatus {
    fn default() -> Self {
        EmbeddingStatus::Pending
    }
}

impl std::fmt::Display for EmbeddingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(EmbeddingStatus::Pending.is_pending());
        assert!(EmbeddingStatus::Queued.is_queued());
        assert!(EmbeddingStatus::Embedding.is_embedding());
        assert!(EmbeddingStatus::Embedded.is_embedded());
        assert!(EmbeddingStatus::Failed("boom".to_string()).is_failed());

        assert!(!EmbeddingStatus::Pending.is_terminal());
        assert!(!EmbeddingStatus::Queued.is_terminal());
        assert!(!EmbeddingStatus::Embedding.is_terminal());
        assert!(EmbeddingStatus::Embedded.is_terminal());
        assert!(EmbeddingStatus::Failed("boom".to_string()).is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        let failed = EmbeddingStatus::Failed("error".to_string());

        assert!(EmbeddingStatus::Pending.can_transition_to(&EmbeddingStatus::Queued));
        assert!(EmbeddingStatus::Queued.can_transition_to(&EmbeddingStatus::Embedding));
        assert!(EmbeddingStatus::Embedding.can_transition_to(&EmbeddingStatus::Embedded));

        assert!(EmbeddingStatus::Pending.can_transition_to(&failed));
        assert!(EmbeddingStatus::Queued.can_transition_to(&failed));
        assert!(EmbeddingStatus::Embedding.can_transition_to(&failed));
    }

    #[test]
    fn test_no_backward_or_terminal_transitions() {
        let failed = EmbeddingStatus::Failed("error".to_string());

        assert!(!EmbeddingStatus::Queued.can_transition_to(&EmbeddingStatus::Pending));
        assert!(!EmbeddingStatus::Pending.can_transition_to(&EmbeddingStatus::Embedded));
        assert!(!EmbeddingStatus::Embedded.can_transition_to(&failed));
        assert!(!failed.can_transition_to(&EmbeddingStatus::Queued));
        assert!(!failed.can_transition_to(&EmbeddingStatus::Embedded));
    }

    #[test]
    fn test_persisted_round_trip() {
        let statuses = vec![
            EmbeddingStatus::Pending,
            EmbeddingStatus::Queued,
            EmbeddingStatus::Embedding,
            EmbeddingStatus::Embedded,
            EmbeddingStatus::Failed("test error".to_string()),
        ];

        for status in statuses {
            let tag = status.as_str();
            let error = status.error_message().map(|e| e.to_string());
            let parsed = EmbeddingStatus::from_parts(tag, error).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_invalid_tag() {
        assert!(EmbeddingStatus::from_parts("done", None).is_err());
    }
}
