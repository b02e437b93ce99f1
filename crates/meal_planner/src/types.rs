//! Domain types shared by the pipeline stages, the store and the surfaces.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Daily macronutrient targets. All four must be finite and positive.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MacroGoals {
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub carb_goal: f64,
    pub fat_goal: f64,
}

impl MacroGoals {
    pub fn validate(&self) -> PlannerResult<()> {
        let fields = [
            ("calorieGoal", self.calorie_goal),
            ("proteinGoal", self.protein_goal),
            ("carbGoal", self.carb_goal),
            ("fatGoal", self.fat_goal),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlannerError::InvalidInput(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Wire shape of a generation request. Goals are optional here so a missing
/// field is reported as invalid input instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    /// User to persist the plan for; nothing is stored when absent.
    pub uid: Option<String>,
}

impl GenerateRequest {
    pub fn goals(&self) -> PlannerResult<MacroGoals> {
        let require = |name: &str, v: Option<f64>| {
            v.ok_or_else(|| PlannerError::InvalidInput(format!("{name} is required")))
        };
        let goals = MacroGoals {
            calorie_goal: require("calorieGoal", self.calorie_goal)?,
            protein_goal: require("proteinGoal", self.protein_goal)?,
            carb_goal: require("carbGoal", self.carb_goal)?,
            fat_goal: require("fatGoal", self.fat_goal)?,
        };
        goals.validate()?;
        Ok(goals)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Unspecified,
}

impl MealSlot {
    /// The three slots of a daily plan, in output order.
    pub const DAILY: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Ingredient {
    pub name: String,
    /// Rendered quantity and unit, e.g. "150 g" or "1 tbsp".
    pub amount: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct NutrientProfile {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedMeal {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub nutrition: NutrientProfile,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealSlot>,
    /// Free-form tracking state set through history updates, e.g. "eaten".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl DetailedMeal {
    pub fn tagged(&self, slot: MealSlot) -> Self {
        Self {
            meal_type: Some(slot),
            ..self.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTotals {
    pub fn of<'a>(meals: impl IntoIterator<Item = &'a DetailedMeal>) -> Self {
        meals.into_iter().fold(Self::default(), |sum, meal| Self {
            calories: sum.calories + meal.nutrition.calories,
            protein: sum.protein + meal.nutrition.protein,
            carbs: sum.carbs + meal.nutrition.carbohydrates,
            fat: sum.fat + meal.nutrition.fat,
        })
    }

    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: self.protein.round(),
            carbs: self.carbs.round(),
            fat: self.fat.round(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub meals: Vec<DetailedMeal>,
    pub total_macros: MacroTotals,
}

/// A plan or history record persisted for one user and one day.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// `YYYY-MM-DD`
    pub date: String,
    pub meals: Vec<DetailedMeal>,
    pub total_macros: MacroTotals,
}
