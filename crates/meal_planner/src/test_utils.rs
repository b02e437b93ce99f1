//! Shared test utilities: an in-memory `RecipeCatalog` with scripted
//! responses and a plan store that always fails.
#![cfg(test)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{PlannerError, PlannerResult};
use crate::store::PlanStore;
use crate::types::DayRecord;
use recipe_catalog_client::{
    Candidate, CatalogError, ExtendedIngredient, Nutrient, Nutrition, RecipeCatalog, RecipeDetail,
};

#[derive(Default)]
pub struct ScriptedCatalog {
    plan: Mutex<Vec<Candidate>>,
    details: Mutex<HashMap<u64, RecipeDetail>>,
    plan_unavailable: Mutex<bool>,
    plan_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn set_plan(&self, candidates: Vec<Candidate>) {
        *self.plan.lock().unwrap() = candidates;
    }

    pub fn insert_detail(&self, detail: RecipeDetail) {
        self.details.lock().unwrap().insert(detail.id, detail);
    }

    pub fn fail_plan(&self) {
        *self.plan_unavailable.lock().unwrap() = true;
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeCatalog for ScriptedCatalog {
    async fn fetch_daily_plan(&self, _target_calories: f64) -> Result<Vec<Candidate>, CatalogError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        if *self.plan_unavailable.lock().unwrap() {
            return Err(CatalogError::from_status(503, "catalog down".into()));
        }
        Ok(self.plan.lock().unwrap().clone())
    }

    async fn fetch_recipe_detail(&self, id: u64) -> Result<RecipeDetail, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("recipe {id}")))
    }
}

pub fn plan_candidate(id: u64, title: &str) -> Candidate {
    Candidate {
        id,
        title: title.to_string(),
        ingredients: vec![],
    }
}

pub fn detail_with_macros(id: u64, calories: f64, protein: f64, carbs: f64, fat: f64) -> RecipeDetail {
    let nutrient = |name: &str, amount: f64| Nutrient {
        name: name.to_string(),
        amount,
        unit: None,
    };
    RecipeDetail {
        id,
        title: None,
        image: Some(format!("https://img.example/{id}.jpg")),
        source_url: Some(format!("https://example.com/recipes/{id}")),
        ready_in_minutes: Some(30),
        servings: Some(1),
        extended_ingredients: vec![],
        nutrition: Some(Nutrition {
            nutrients: vec![
                nutrient("Calories", calories),
                nutrient("Protein", protein),
                nutrient("Carbohydrates", carbs),
                nutrient("Fat", fat),
            ],
        }),
        instructions: Some("Cook.".into()),
    }
}

/// Detail with zeroed macros and the given ingredient names, one gram each.
pub fn detail_with_ingredients(id: u64, names: &[&str]) -> RecipeDetail {
    RecipeDetail {
        extended_ingredients: names
            .iter()
            .map(|name| ExtendedIngredient {
                name: name.to_string(),
                amount: 1.0,
                unit: "g".into(),
            })
            .collect(),
        ..detail_with_macros(id, 0.0, 0.0, 0.0, 0.0)
    }
}

/// Store whose every call fails, for exercising internal-error paths.
pub struct FailingPlanStore;

#[async_trait]
impl PlanStore for FailingPlanStore {
    async fn save_generated_plan(&self, _uid: &str, _record: DayRecord) -> PlannerResult<()> {
        Err(unavailable())
    }

    async fn get_generated_plan(&self, _uid: &str, _date: &str) -> PlannerResult<Option<DayRecord>> {
        Err(unavailable())
    }

    async fn save_meal_history(&self, _uid: &str, _record: DayRecord) -> PlannerResult<DayRecord> {
        Err(unavailable())
    }

    async fn get_meal_history(&self, _uid: &str) -> PlannerResult<Vec<DayRecord>> {
        Err(unavailable())
    }

    async fn get_meal_history_for(&self, _uid: &str, _date: &str) -> PlannerResult<Option<DayRecord>> {
        Err(unavailable())
    }

    async fn update_meal_status(
        &self,
        _uid: &str,
        _date: &str,
        _meal_title: &str,
        _new_status: &str,
    ) -> PlannerResult<Option<DayRecord>> {
        Err(unavailable())
    }
}

fn unavailable() -> PlannerError {
    PlannerError::Store("backing store unavailable".into())
}
