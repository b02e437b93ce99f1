//! JSON HTTP routes over [`MealPlanService`].

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use crate::error::{Operation, PlannerError};
use crate::services::MealPlanService;
use crate::types::{DayRecord, DetailedMeal, GenerateRequest, MacroTotals, PlanResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveHistoryBody {
    pub uid: String,
    pub date: String,
    pub meals: Vec<DetailedMeal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStatusBody {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub meal_title: String,
    #[serde(default)]
    pub new_status: String,
}

#[derive(Debug, Serialize)]
struct SavedResponse {
    message: &'static str,
    entry: DayRecord,
}

/// Error wrapper that renders the caller-safe message with a matching status.
pub struct ApiError {
    err: PlannerError,
    op: Operation,
}

impl ApiError {
    /// Mapper for errors raised while serving `op`.
    pub fn during(op: Operation) -> impl Fn(PlannerError) -> ApiError {
        move |err| ApiError { err, op }
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Self {
            err,
            op: Operation::GeneratePlan,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.err {
            PlannerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlannerError::InsufficientCandidates { .. } | PlannerError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            PlannerError::Upstream(_) | PlannerError::Store(_) | PlannerError::Serialization(_) => {
                tracing::error!(error = %self.err, op = ?self.op, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.err.public_message_for(self.op),
        };
        (status, Json(body)).into_response()
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn generate(
    State(service): State<MealPlanService>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<PlanResult>, ApiError> {
    let plan = service.generate_from_request(&req).await?;
    Ok(Json(plan))
}

async fn generated_meals(
    State(service): State<MealPlanService>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DayRecord>, ApiError> {
    let uid = params.get("uid").map(String::as_str).unwrap_or_default();
    let date = params.get("date").map(String::as_str).unwrap_or_default();
    let record = service
        .generated_plan(uid, date)
        .await
        .map_err(ApiError::during(Operation::FetchGeneratedPlan))?;
    Ok(Json(record))
}

async fn save_history(
    State(service): State<MealPlanService>,
    Json(body): Json<SaveHistoryBody>,
) -> Result<Json<SavedResponse>, ApiError> {
    let record = DayRecord {
        date: body.date,
        total_macros: MacroTotals::of(&body.meals),
        meals: body.meals,
    };
    let entry = service
        .save_history(&body.uid, record)
        .await
        .map_err(ApiError::during(Operation::SaveHistory))?;
    Ok(Json(SavedResponse {
        message: "Meal history saved",
        entry,
    }))
}

/// With `date`, the entry for that day; otherwise every entry for `uid`.
async fn history(
    State(service): State<MealPlanService>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let uid = params.get("uid").map(String::as_str).unwrap_or_default();
    let fail = ApiError::during(Operation::FetchHistory);
    match params.get("date") {
        Some(date) => {
            let entry = service.history_for(uid, date).await.map_err(fail)?;
            Ok(Json(entry).into_response())
        }
        None => {
            let entries = service.history(uid).await.map_err(fail)?;
            Ok(Json(entries).into_response())
        }
    }
}

async fn update_meal_status(
    State(service): State<MealPlanService>,
    Json(body): Json<MealStatusBody>,
) -> Result<Json<SavedResponse>, ApiError> {
    let entry = service
        .update_meal_status(&body.uid, &body.date, &body.meal_title, &body.new_status)
        .await
        .map_err(ApiError::during(Operation::UpdateMealStatus))?;
    Ok(Json(SavedResponse {
        message: "Meal status updated successfully.",
        entry,
    }))
}

/// Health and planner routes. Metrics and MCP are mounted by the server
/// binary.
pub fn router(service: MealPlanService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/meals/generate", post(generate))
        .route("/api/meals/generated", get(generated_meals))
        .route("/api/history", post(save_history).get(history))
        .route("/api/history/status", patch(update_meal_status))
        .with_state(service)
}
