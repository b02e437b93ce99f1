//! `RecipeCatalog` trait, wire types, and a reqwest-based implementation for
//! a Spoonacular-compatible recipe catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod retry;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decoding error: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Status { status, body }
    }

    /// Transport failures and 5xx / 429 responses are worth another attempt;
    /// everything else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A recipe reference as returned by the day-plan endpoint, before any
/// detail lookup. The day plan usually carries no ingredients, in which case
/// only the title takes part in dietary filtering.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<CandidateIngredient>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CandidateIngredient {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(default)]
    pub id: u64,
    pub title: Option<String>,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    pub nutrition: Option<Nutrition>,
    pub instructions: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Nutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    pub unit: Option<String>,
}

#[async_trait]
pub trait RecipeCatalog: Send + Sync + 'static {
    /// Fetch a day's worth of candidate recipes for the given calorie target.
    async fn fetch_daily_plan(&self, target_calories: f64) -> Result<Vec<Candidate>, CatalogError>;

    /// Fetch full ingredient and nutrient detail for a recipe.
    async fn fetch_recipe_detail(&self, id: u64) -> Result<RecipeDetail, CatalogError>;
}
