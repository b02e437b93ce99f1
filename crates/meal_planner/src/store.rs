//! Persistence contract for generated plans and meal history, plus an
//! in-memory implementation.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::PlannerResult;
use crate::types::{DayRecord, MacroTotals};

#[async_trait]
pub trait PlanStore: Send + Sync + 'static {
    /// Store the plan generated for `uid` on `record.date`, replacing any
    /// earlier plan for that day.
    async fn save_generated_plan(&self, uid: &str, record: DayRecord) -> PlannerResult<()>;

    async fn get_generated_plan(&self, uid: &str, date: &str) -> PlannerResult<Option<DayRecord>>;

    /// Record eaten meals for a day, merged with what is already stored (see
    /// [`merge_history`]). Returns the stored entry.
    async fn save_meal_history(&self, uid: &str, record: DayRecord) -> PlannerResult<DayRecord>;

    /// All history entries for `uid`, oldest first.
    async fn get_meal_history(&self, uid: &str) -> PlannerResult<Vec<DayRecord>>;

    async fn get_meal_history_for(&self, uid: &str, date: &str) -> PlannerResult<Option<DayRecord>>;

    /// Set `status` on every meal titled exactly `meal_title` in the entry for
    /// `date`. `None` when there is no entry for that day.
    async fn update_meal_status(
        &self,
        uid: &str,
        date: &str,
        meal_title: &str,
        new_status: &str,
    ) -> PlannerResult<Option<DayRecord>>;
}

/// Merge an incoming history record into the existing one for the same day.
///
/// Meals whose id is already recorded are skipped and totals are recomputed
/// over the merged list. Without an existing entry the incoming record is
/// kept as given.
pub fn merge_history(existing: Option<DayRecord>, incoming: DayRecord) -> DayRecord {
    let Some(mut merged) = existing else {
        return incoming;
    };
    for meal in incoming.meals {
        if !merged.meals.iter().any(|m| m.id == meal.id) {
            merged.meals.push(meal);
        }
    }
    merged.total_macros = MacroTotals::of(&merged.meals);
    merged.date = incoming.date;
    merged
}

type UserDays = HashMap<String, BTreeMap<String, DayRecord>>;

/// Process-local store. Data lives as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryPlanStore {
    generated: Arc<Mutex<UserDays>>,
    history: Arc<Mutex<UserDays>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn save_generated_plan(&self, uid: &str, record: DayRecord) -> PlannerResult<()> {
        let mut map = self.generated.lock().await;
        map.entry(uid.to_string())
            .or_default()
            .insert(record.date.clone(), record);
        Ok(())
    }

    async fn get_generated_plan(&self, uid: &str, date: &str) -> PlannerResult<Option<DayRecord>> {
        let map = self.generated.lock().await;
        Ok(map.get(uid).and_then(|days| days.get(date)).cloned())
    }

    async fn save_meal_history(&self, uid: &str, record: DayRecord) -> PlannerResult<DayRecord> {
        let mut map = self.history.lock().await;
        let days = map.entry(uid.to_string()).or_default();
        let date = record.date.clone();
        let merged = merge_history(days.remove(&date), record);
        days.insert(date, merged.clone());
        Ok(merged)
    }

    async fn get_meal_history(&self, uid: &str) -> PlannerResult<Vec<DayRecord>> {
        let map = self.history.lock().await;
        Ok(map
            .get(uid)
            .map(|days| days.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_meal_history_for(&self, uid: &str, date: &str) -> PlannerResult<Option<DayRecord>> {
        let map = self.history.lock().await;
        Ok(map.get(uid).and_then(|days| days.get(date)).cloned())
    }

    async fn update_meal_status(
        &self,
        uid: &str,
        date: &str,
        meal_title: &str,
        new_status: &str,
    ) -> PlannerResult<Option<DayRecord>> {
        let mut map = self.history.lock().await;
        let Some(record) = map.get_mut(uid).and_then(|days| days.get_mut(date)) else {
            return Ok(None);
        };
        for meal in record.meals.iter_mut().filter(|m| m.title == meal_title) {
            meal.status = Some(new_status.to_string());
        }
        Ok(Some(record.clone()))
    }
}
