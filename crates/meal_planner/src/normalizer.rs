//! Turns filtered candidates into [`DetailedMeal`]s: fetches recipe detail,
//! keeps the four macro nutrients and renders ingredient amounts.

use std::sync::Arc;

use futures_util::future::try_join_all;
use recipe_catalog_client::{Candidate, ExtendedIngredient, Nutrient, RecipeCatalog, RecipeDetail};

use crate::dietary_filter::DietaryFilter;
use crate::error::PlannerResult;
use crate::types::{DetailedMeal, Ingredient, NutrientProfile};

/// Upper bound on detail lookups per request. The triple search is cubic in
/// this number.
pub const DEFAULT_CANDIDATE_CAP: usize = 60;

const COUNTED_UNITS: &[&str] = &["tsp", "tbsp", "teaspoon", "tablespoon"];

const GRAMS_PER_UNIT: &[(&str, f64)] = &[
    ("cup", 240.0),
    ("ounce", 28.0),
    ("oz", 28.0),
    ("lb", 454.0),
    ("pound", 454.0),
    ("grams", 1.0),
    ("gram", 1.0),
    ("g", 1.0),
];

const TRACKED_NUTRIENTS: [&str; 4] = ["Calories", "Protein", "Carbohydrates", "Fat"];

/// Render an ingredient quantity.
///
/// Spoon measures stay counted (`"1 tbsp"`), known mass and volume units are
/// converted to whole grams, and anything else is assumed to be grams already.
pub fn convert_amount(amount: f64, unit: &str) -> String {
    let unit = unit.to_lowercase();
    if COUNTED_UNITS.contains(&unit.as_str()) {
        return format!("{} {}", amount.round() as i64, unit);
    }
    let factor = GRAMS_PER_UNIT
        .iter()
        .find(|(u, _)| *u == unit)
        .map(|(_, f)| *f)
        .unwrap_or(1.0);
    format!("{} g", (amount * factor).round() as i64)
}

/// Pick calories, protein, carbohydrates and fat out of a nutrient list by
/// exact name. Returns the profile together with the names that were absent;
/// absent nutrients are left at zero.
pub fn extract_nutrients(nutrients: &[Nutrient]) -> (NutrientProfile, Vec<&'static str>) {
    let mut profile = NutrientProfile::default();
    let mut seen = [false; TRACKED_NUTRIENTS.len()];
    for n in nutrients {
        let Some(idx) = TRACKED_NUTRIENTS.iter().position(|t| *t == n.name) else {
            continue;
        };
        seen[idx] = true;
        match n.name.to_lowercase().as_str() {
            "calories" => profile.calories = n.amount,
            "protein" => profile.protein = n.amount,
            "carbohydrates" => profile.carbohydrates = n.amount,
            "fat" => profile.fat = n.amount,
            _ => {}
        }
    }
    let missing = TRACKED_NUTRIENTS
        .iter()
        .zip(seen)
        .filter(|(_, s)| !s)
        .map(|(name, _)| *name)
        .collect();
    (profile, missing)
}

fn normalize_ingredient(i: &ExtendedIngredient) -> Ingredient {
    Ingredient {
        name: i.name.to_lowercase().trim().to_string(),
        amount: convert_amount(i.amount, &i.unit),
    }
}

/// Build a [`DetailedMeal`] from a candidate and its fetched detail.
pub fn normalize(candidate: &Candidate, detail: RecipeDetail) -> DetailedMeal {
    let nutrients = detail
        .nutrition
        .as_ref()
        .map(|n| n.nutrients.as_slice())
        .unwrap_or_default();
    let (nutrition, missing) = extract_nutrients(nutrients);
    if !missing.is_empty() {
        tracing::warn!(
            recipe_id = candidate.id,
            missing = ?missing,
            "recipe lacks macro nutrients; treating them as zero"
        );
        metrics::counter!("recipes_missing_nutrients_total").increment(1);
    }

    DetailedMeal {
        id: candidate.id,
        title: candidate.title.clone(),
        image: detail.image,
        source_url: detail.source_url,
        ready_in_minutes: detail.ready_in_minutes,
        servings: detail.servings,
        ingredients: detail
            .extended_ingredients
            .iter()
            .map(normalize_ingredient)
            .collect(),
        nutrition,
        instructions: detail.instructions.unwrap_or_default(),
        meal_type: None,
        status: None,
    }
}

/// Fetches detail for a batch of candidates concurrently and applies the
/// dietary rules to the fetched ingredient lists.
#[derive(Clone)]
pub struct Normalizer {
    catalog: Arc<dyn RecipeCatalog>,
    filter: DietaryFilter,
    candidate_cap: usize,
}

impl Normalizer {
    pub fn new(catalog: Arc<dyn RecipeCatalog>, filter: DietaryFilter, candidate_cap: usize) -> Self {
        Self {
            catalog,
            filter,
            candidate_cap,
        }
    }

    /// Normalize the first `candidate_cap` candidates, preserving order.
    ///
    /// All lookups are issued at once and awaited together. The first failed
    /// lookup fails the batch; no partial result is returned. Recipes whose
    /// detail lists a forbidden ingredient are left out.
    pub async fn normalize_all(&self, candidates: &[Candidate]) -> PlannerResult<Vec<DetailedMeal>> {
        let batch = &candidates[..candidates.len().min(self.candidate_cap)];
        tracing::debug!(count = batch.len(), "fetching recipe detail");
        let meals = try_join_all(batch.iter().map(|c| async move {
            let detail = self.catalog.fetch_recipe_detail(c.id).await?;
            Ok::<_, crate::error::PlannerError>(self.screen(c, detail))
        }))
        .await?;
        Ok(meals.into_iter().flatten().collect())
    }

    /// `None` when any fetched ingredient is forbidden; otherwise the meal
    /// with ingredient names passed through the substitution table.
    fn screen(&self, candidate: &Candidate, mut detail: RecipeDetail) -> Option<DetailedMeal> {
        if let Some(hit) = detail
            .extended_ingredients
            .iter()
            .find(|i| self.filter.is_forbidden(&i.name))
        {
            tracing::debug!(
                recipe_id = candidate.id,
                ingredient = %hit.name,
                "dropping recipe with forbidden ingredient"
            );
            metrics::counter!("recipes_excluded_by_ingredients_total").increment(1);
            return None;
        }
        for ingredient in &mut detail.extended_ingredients {
            ingredient.name = self.filter.substitute(&ingredient.name);
        }
        Some(normalize(candidate, detail))
    }
}
