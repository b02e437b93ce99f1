use std::sync::Arc;

use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use recipe_catalog_client::RecipeCatalog;

pub mod classifier;
pub mod config;
pub mod dietary_filter;
pub mod error;
pub mod http_api;
pub mod normalizer;
pub mod optimizer;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::PlannerConfig;
pub use error::{Operation, PlannerError, PlannerResult};
pub use services::MealPlanService;
pub use store::{InMemoryPlanStore, PlanStore};
pub use types::{
    DayRecord, DetailedMeal, GenerateRequest, MacroGoals, MacroTotals, MealSlot, PlanResult,
};

#[derive(Clone)]
pub struct MealPlannerHandler {
    service: MealPlanService,
    tool_router: rmcp::handler::server::tool::ToolRouter<MealPlannerHandler>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedMealsParams {
    pub uid: String,
    /// YYYY-MM-DD; defaults to today (UTC).
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SaveHistoryParams {
    pub uid: String,
    pub date: String,
    pub meals: Vec<DetailedMeal>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct UidParam {
    pub uid: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct HistoryDateParams {
    pub uid: String,
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealStatusParams {
    pub uid: String,
    pub date: String,
    /// Exact title of the meal(s) to update.
    pub meal_title: String,
    pub new_status: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct HistoryResult {
    pub entries: Vec<DayRecord>,
}

#[tool_router]
impl MealPlannerHandler {
    pub fn new(service: MealPlanService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Handler over an in-memory store with default planner settings.
    pub fn with_catalog(catalog: Arc<dyn RecipeCatalog>) -> PlannerResult<Self> {
        let service = MealPlanService::new(
            catalog,
            Arc::new(InMemoryPlanStore::new()),
            &PlannerConfig::default(),
        )?;
        Ok(Self::new(service))
    }

    pub fn service(&self) -> &MealPlanService {
        &self.service
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    #[tool(
        name = "generate_meal_plan",
        description = "Build a halal breakfast/lunch/dinner plan whose combined macros best match the daily calorie, protein, carb and fat goals. Pass uid to save the plan for today."
    )]
    async fn generate_meal_plan(
        &self,
        params: Parameters<GenerateRequest>,
    ) -> Result<Json<PlanResult>, String> {
        let plan = self.service.generate_from_request(&params.0).await?;
        Ok(Json(plan))
    }

    #[tool(
        name = "get_generated_meals",
        description = "Get the plan generated for a user on a date (default today, UTC)"
    )]
    async fn get_generated_meals(
        &self,
        params: Parameters<GeneratedMealsParams>,
    ) -> Result<Json<DayRecord>, String> {
        let p = params.0;
        let date = p.date.unwrap_or_else(utils::today_utc);
        let record = self
            .service
            .generated_plan(&p.uid, &date)
            .await
            .map_err(|e| e.public_message_for(Operation::FetchGeneratedPlan))?;
        Ok(Json(record))
    }

    #[tool(
        name = "save_meal_history",
        description = "Record eaten meals for a day; meals already recorded for that day are skipped"
    )]
    async fn save_meal_history(
        &self,
        params: Parameters<SaveHistoryParams>,
    ) -> Result<Json<DayRecord>, String> {
        let p = params.0;
        let record = DayRecord {
            date: p.date,
            total_macros: MacroTotals::of(&p.meals),
            meals: p.meals,
        };
        let saved = self
            .service
            .save_history(&p.uid, record)
            .await
            .map_err(|e| e.public_message_for(Operation::SaveHistory))?;
        Ok(Json(saved))
    }

    #[tool(
        name = "get_meal_history",
        description = "List a user's meal history, oldest day first"
    )]
    async fn get_meal_history(
        &self,
        params: Parameters<UidParam>,
    ) -> Result<Json<HistoryResult>, String> {
        let entries = self
            .service
            .history(&params.0.uid)
            .await
            .map_err(|e| e.public_message_for(Operation::FetchHistory))?;
        Ok(Json(HistoryResult { entries }))
    }

    #[tool(
        name = "get_meal_history_for_date",
        description = "Get a user's meal history entry for one day"
    )]
    async fn get_meal_history_for_date(
        &self,
        params: Parameters<HistoryDateParams>,
    ) -> Result<Json<DayRecord>, String> {
        let p = params.0;
        let entry = self
            .service
            .history_for(&p.uid, &p.date)
            .await
            .map_err(|e| e.public_message_for(Operation::FetchHistory))?;
        Ok(Json(entry))
    }

    #[tool(
        name = "update_meal_status",
        description = "Set the status (e.g. eaten, skipped) of the meals with the given title in a day's history"
    )]
    async fn update_meal_status(
        &self,
        params: Parameters<MealStatusParams>,
    ) -> Result<Json<DayRecord>, String> {
        let p = params.0;
        let entry = self
            .service
            .update_meal_status(&p.uid, &p.date, &p.meal_title, &p.new_status)
            .await
            .map_err(|e| e.public_message_for(Operation::UpdateMealStatus))?;
        Ok(Json(entry))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for MealPlannerHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
        )
        .with_instructions(
            "Macro meal planner MCP server - generates halal daily meal plans that \
             match calorie and macronutrient goals, and keeps a per-user meal history.",
        )
    }
}
