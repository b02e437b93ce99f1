use axum::debug_handler;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use meal_planner::{
    InMemoryPlanStore, MealPlanService, MealPlannerHandler, PlannerConfig, http_api,
};
use recipe_catalog_client::config::Config;
use recipe_catalog_client::http_client::ReqwestCatalogClient;

#[debug_handler]
async fn metrics_endpoint(State(metrics): State<PrometheusHandle>) -> impl IntoResponse {
    let body = metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

/// Body limit from `MAX_HTTP_BODY_SIZE`, default 1 MiB.
fn max_body_size_from(raw: Option<String>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1024 * 1024)
}

fn bind_address_from(raw: Option<String>) -> SocketAddr {
    raw.and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)))
}


#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `MEAL_PLANNER_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("MEAL_PLANNER_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env.clone())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rmcp=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(%log_env, "meal_planner:http: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let catalog_config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid catalog configuration; aborting startup");
            std::process::exit(1);
        }
    };
    let planner_config = PlannerConfig::from_env()?;
    let client = ReqwestCatalogClient::from_config(&catalog_config)?;
    let service = MealPlanService::new(
        Arc::new(client),
        Arc::new(InMemoryPlanStore::new()),
        &planner_config,
    )?;

    let max_body_size = max_body_size_from(std::env::var("MAX_HTTP_BODY_SIZE").ok());

    // rmcp StreamableHttpService mounted at /mcp, sharing the plan store
    let handler = MealPlannerHandler::new(service.clone());
    let factory = move || -> Result<_, std::io::Error> { Ok(handler.clone()) };
    let session = Arc::new(
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default(),
    );
    let mcp_service = rmcp::transport::streamable_http_server::tower::StreamableHttpService::new(
        factory,
        session,
        rmcp::transport::streamable_http_server::tower::StreamableHttpServerConfig::default(),
    );

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_endpoint))
        .with_state(handle);

    let app = http_api::router(service)
        .merge(metrics_routes)
        .nest_service("/mcp", mcp_service)
        .layer(axum::extract::DefaultBodyLimit::max(max_body_size));

    let addr = bind_address_from(std::env::var("ADDRESS").ok());
    info!(%addr, max_body_bytes = max_body_size, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
