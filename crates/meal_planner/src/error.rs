//! Error types for meal plan generation.

use thiserror::Error;

/// Failures surfaced by the planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Recipe catalog unavailable: {0}")]
    Upstream(#[from] recipe_catalog_client::CatalogError),

    #[error("No suitable meal combination found ({available} meals available)")]
    InsufficientCandidates { available: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::InvalidInput(_) => "invalid_input",
            PlannerError::Upstream(_) => "upstream",
            PlannerError::InsufficientCandidates { .. } => "insufficient_candidates",
            PlannerError::NotFound(_) => "not_found",
            PlannerError::Store(_) => "store",
            PlannerError::Serialization(_) => "serialization",
        }
    }

    /// Message safe to show to callers of plan generation. Upstream and
    /// internal details stay in the logs.
    pub fn public_message(&self) -> String {
        self.public_message_for(Operation::GeneratePlan)
    }

    /// Caller-safe message for a failure during `op`. Internal failures are
    /// worded after the operation that hit them.
    pub fn public_message_for(&self, op: Operation) -> String {
        match self {
            PlannerError::InvalidInput(msg) => msg.clone(),
            PlannerError::InsufficientCandidates { .. } => {
                "No suitable meal combination found.".to_string()
            }
            PlannerError::NotFound(msg) => msg.clone(),
            PlannerError::Upstream(_) | PlannerError::Store(_) | PlannerError::Serialization(_) => {
                op.failure_message().to_string()
            }
        }
    }
}

/// Caller-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GeneratePlan,
    FetchGeneratedPlan,
    SaveHistory,
    FetchHistory,
    UpdateMealStatus,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::GeneratePlan => "Failed to generate meal plan",
            Operation::FetchGeneratedPlan => "Failed to fetch generated meals.",
            Operation::SaveHistory => "Failed to save meal history.",
            Operation::FetchHistory => "Failed to fetch meal history.",
            Operation::UpdateMealStatus => "Failed to update meal status.",
        }
    }
}

impl From<PlannerError> for String {
    fn from(err: PlannerError) -> Self {
        err.public_message()
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_details_are_not_public() {
        let err: PlannerError =
            recipe_catalog_client::CatalogError::Auth("key abc123 rejected".into()).into();
        assert_eq!(err.kind(), "upstream");
        assert_eq!(err.public_message(), "Failed to generate meal plan");
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn insufficient_candidates_is_distinct() {
        let err = PlannerError::InsufficientCandidates { available: 2 };
        assert_eq!(err.kind(), "insufficient_candidates");
        assert_eq!(err.public_message(), "No suitable meal combination found.");
    }

    #[test]
    fn internal_failures_are_worded_per_operation() {
        let err = PlannerError::Store("connection reset".into());
        assert_eq!(err.public_message(), "Failed to generate meal plan");
        assert_eq!(
            err.public_message_for(Operation::SaveHistory),
            "Failed to save meal history."
        );
        assert_eq!(
            err.public_message_for(Operation::FetchHistory),
            "Failed to fetch meal history."
        );
        assert_eq!(
            err.public_message_for(Operation::UpdateMealStatus),
            "Failed to update meal status."
        );
        let not_found = PlannerError::NotFound("Meal history not found.".into());
        assert_eq!(
            not_found.public_message_for(Operation::UpdateMealStatus),
            "Meal history not found."
        );
    }
}
