//! Plan generation pipeline and store-backed plan/history operations.

use std::sync::Arc;

use recipe_catalog_client::RecipeCatalog;

use crate::classifier::SlotClassifier;
use crate::config::PlannerConfig;
use crate::dietary_filter::{DietaryFilter, DietaryRules};
use crate::error::{PlannerError, PlannerResult};
use crate::normalizer::Normalizer;
use crate::optimizer::optimize;
use crate::store::PlanStore;
use crate::types::{DayRecord, GenerateRequest, MacroGoals, PlanResult};
use crate::utils::{normalize_date_str, today_utc};

#[derive(Clone)]
pub struct MealPlanService {
    catalog: Arc<dyn RecipeCatalog>,
    store: Arc<dyn PlanStore>,
    filter: DietaryFilter,
    normalizer: Normalizer,
    classifier: SlotClassifier,
}

impl MealPlanService {
    /// Service with the stock halal rules and slot keywords.
    pub fn new(
        catalog: Arc<dyn RecipeCatalog>,
        store: Arc<dyn PlanStore>,
        config: &PlannerConfig,
    ) -> PlannerResult<Self> {
        let filter = DietaryFilter::new(DietaryRules::default())?;
        Ok(Self::with_parts(
            catalog,
            store,
            filter,
            SlotClassifier::default(),
            config,
        ))
    }

    pub fn with_parts(
        catalog: Arc<dyn RecipeCatalog>,
        store: Arc<dyn PlanStore>,
        filter: DietaryFilter,
        classifier: SlotClassifier,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(catalog.clone(), filter.clone(), config.candidate_cap),
            catalog,
            store,
            filter,
            classifier,
        }
    }

    pub async fn generate_from_request(&self, req: &GenerateRequest) -> PlannerResult<PlanResult> {
        let goals = match req.goals() {
            Ok(goals) => goals,
            Err(e) => {
                metrics::counter!("plan_generation_failures_total", "kind" => e.kind())
                    .increment(1);
                return Err(e);
            }
        };
        self.generate(&goals, req.uid.as_deref()).await
    }

    /// Generate a one-day plan for `goals` and, when `uid` is given, store it
    /// under today's date. Nothing is stored when generation fails.
    pub async fn generate(&self, goals: &MacroGoals, uid: Option<&str>) -> PlannerResult<PlanResult> {
        let result = self.run_pipeline(goals, uid).await;
        match &result {
            Ok(plan) => {
                metrics::counter!("plans_generated_total").increment(1);
                tracing::info!(
                    meals = plan.meals.len(),
                    calories = plan.total_macros.calories,
                    protein = plan.total_macros.protein,
                    "generated meal plan"
                );
            }
            Err(e) => {
                metrics::counter!("plan_generation_failures_total", "kind" => e.kind())
                    .increment(1);
                tracing::error!(error = %e, "meal plan generation failed");
            }
        }
        result
    }

    async fn run_pipeline(&self, goals: &MacroGoals, uid: Option<&str>) -> PlannerResult<PlanResult> {
        goals.validate()?;

        let candidates = self.catalog.fetch_daily_plan(goals.calorie_goal).await?;
        let fetched = candidates.len();
        let candidates = self.filter.filter(candidates);
        tracing::debug!(fetched, kept = candidates.len(), "filtered candidates");

        let meals = self.normalizer.normalize_all(&candidates).await?;
        let best = optimize(&meals, goals).ok_or(PlannerError::InsufficientCandidates {
            available: meals.len(),
        })?;
        tracing::debug!(penalty = best.penalty, "best combination");

        let plan = PlanResult {
            meals: self.classifier.assign(&best.meals),
            total_macros: best.totals.rounded(),
        };

        if let Some(uid) = uid.map(str::trim).filter(|u| !u.is_empty()) {
            let record = DayRecord {
                date: today_utc(),
                meals: plan.meals.clone(),
                total_macros: plan.total_macros,
            };
            self.store.save_generated_plan(uid, record).await?;
        }

        Ok(plan)
    }

    pub async fn generated_plan(&self, uid: &str, date: &str) -> PlannerResult<DayRecord> {
        let (uid, date) = require_uid_and_date(uid, date)?;
        self.store
            .get_generated_plan(uid, &date)
            .await?
            .ok_or_else(|| PlannerError::NotFound(format!("no generated meals for {date}")))
    }

    pub async fn save_history(&self, uid: &str, record: DayRecord) -> PlannerResult<DayRecord> {
        let (uid, date) = require_uid_and_date(uid, &record.date)?;
        if record.meals.is_empty() {
            return Err(PlannerError::InvalidInput("meals are required".into()));
        }
        self.store
            .save_meal_history(uid, DayRecord { date, ..record })
            .await
    }

    pub async fn history(&self, uid: &str) -> PlannerResult<Vec<DayRecord>> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(PlannerError::InvalidInput("uid is required".into()));
        }
        self.store.get_meal_history(uid).await
    }

    /// History entry for one day.
    pub async fn history_for(&self, uid: &str, date: &str) -> PlannerResult<DayRecord> {
        let (uid, date) = require_uid_and_date(uid, date)?;
        self.store
            .get_meal_history_for(uid, &date)
            .await?
            .ok_or_else(|| PlannerError::NotFound("No meal history found for this date.".into()))
    }

    /// Set the status of the meals titled `meal_title` in the history entry
    /// for `date`, returning the updated entry.
    pub async fn update_meal_status(
        &self,
        uid: &str,
        date: &str,
        meal_title: &str,
        new_status: &str,
    ) -> PlannerResult<DayRecord> {
        if [uid, date, meal_title, new_status]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(PlannerError::InvalidInput("Missing required fields.".into()));
        }
        let (uid, date) = require_uid_and_date(uid, date)?;
        let updated = self
            .store
            .update_meal_status(uid, &date, meal_title, new_status)
            .await?
            .ok_or_else(|| PlannerError::NotFound("Meal history not found.".into()))?;
        tracing::info!(%date, meal_title, new_status, "updated meal status");
        Ok(updated)
    }
}

fn require_uid_and_date<'a>(uid: &'a str, date: &str) -> PlannerResult<(&'a str, String)> {
    let uid = uid.trim();
    if uid.is_empty() || date.trim().is_empty() {
        return Err(PlannerError::InvalidInput("uid and date required".into()));
    }
    let date = normalize_date_str(date)
        .ok_or_else(|| PlannerError::InvalidInput(format!("invalid date: {date}")))?;
    Ok((uid, date))
}
