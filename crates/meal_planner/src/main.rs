use std::sync::Arc;

use meal_planner::{InMemoryPlanStore, MealPlanService, MealPlannerHandler, PlannerConfig};
use recipe_catalog_client::config::Config;
use recipe_catalog_client::http_client::ReqwestCatalogClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging from env var `MEAL_PLANNER_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("MEAL_PLANNER_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Keep rmcp internals quiet unless asked for.
    let combined_filter = format!("{},rmcp=warn,serve_inner=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rmcp=warn,serve_inner=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("meal_planner: log filter: {}", log_env);

    let catalog_config = Config::from_env()?;
    let planner_config = PlannerConfig::from_env()?;
    let client = ReqwestCatalogClient::from_config(&catalog_config)?;
    let service = MealPlanService::new(
        Arc::new(client),
        Arc::new(InMemoryPlanStore::new()),
        &planner_config,
    )?;
    let handler = MealPlannerHandler::new(service);

    tracing::info!(
        "meal_planner: registered {} tools (candidate cap {})",
        handler.tool_count(),
        planner_config.candidate_cap
    );

    // stdio transport so the server is usable by MCP clients directly
    tracing::info!("meal_planner: starting stdio MCP server...");

    use rmcp::serve_server;
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = serve_server(handler, transport).await?;

    tracing::info!("meal_planner: service initialized as server");

    server.waiting().await?;

    Ok(())
}
