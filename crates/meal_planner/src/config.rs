use crate::error::{PlannerError, PlannerResult};
use crate::normalizer::DEFAULT_CANDIDATE_CAP;

#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Maximum number of filtered candidates that get a detail lookup.
    pub candidate_cap: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> PlannerResult<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function.
    pub fn from_env_with<F>(mut get: F) -> PlannerResult<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let candidate_cap = match get("MEAL_PLANNER_CANDIDATE_CAP") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                PlannerError::InvalidInput(format!("invalid MEAL_PLANNER_CANDIDATE_CAP: {raw}"))
            })?,
            None => DEFAULT_CANDIDATE_CAP,
        };
        if candidate_cap < 3 {
            return Err(PlannerError::InvalidInput(
                "MEAL_PLANNER_CANDIDATE_CAP must be at least 3".into(),
            ));
        }
        if candidate_cap > DEFAULT_CANDIDATE_CAP {
            tracing::warn!(
                candidate_cap,
                "candidate cap above {DEFAULT_CANDIDATE_CAP}; triple search grows cubically"
            );
        }
        Ok(Self { candidate_cap })
    }
}
