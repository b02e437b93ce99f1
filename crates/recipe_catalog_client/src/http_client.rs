//! HTTP client implementation for a Spoonacular-compatible recipe catalog.
//!
//! This module provides a reqwest-based implementation of the [`RecipeCatalog`](crate::RecipeCatalog) trait.

use crate::config::{Config, DEFAULT_TIMEOUT};
use crate::retry::RetryPolicy;
use crate::{CatalogError, Candidate, RecipeCatalog, RecipeDetail};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Client for the recipe catalog API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestCatalogClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestCatalogClient {
    /// Create a new client instance with the default timeout and no retries.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the catalog API (e.g., "https://api.spoonacular.com")
    /// * `api_key` - The API key sent as the `apiKey` query parameter
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, CatalogError> {
        Self::with_options(base_url, api_key, DEFAULT_TIMEOUT, RetryPolicy::none())
    }

    pub fn from_config(cfg: &Config) -> Result<Self, CatalogError> {
        let retry = RetryPolicy {
            max_retries: cfg.max_retries,
            ..RetryPolicy::default()
        };
        Self::with_options(&cfg.base_url, cfg.api_key.clone(), cfg.timeout, retry)
    }

    pub fn with_options(
        base_url: &str,
        api_key: SecretString,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            retry,
        })
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .query(&[("apiKey", self.api_key.expose_secret())])
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read body as text first so decoding failures carry a useful snippet.
        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            CatalogError::Decode(format!("{e} - body: {body_snippet}"))
        })
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> CatalogError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => CatalogError::NotFound(body_snippet),
            401 | 402 | 403 => CatalogError::Auth(body_snippet),
            _ => CatalogError::from_status(status, body_snippet),
        }
    }

    /// GET `url` with `query`, retrying transient failures per the policy.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        metrics::counter!("catalog_requests_total", "endpoint" => endpoint).increment(1);
        let result = self
            .retry
            .retry_async_when(
                || self.execute_json(self.get_request(url).query(query)),
                CatalogError::is_retryable,
            )
            .await;
        if let Err(e) = &result {
            metrics::counter!("catalog_request_failures_total", "endpoint" => endpoint)
                .increment(1);
            tracing::warn!(endpoint, error = %e, "catalog request failed");
        }
        result
    }
}

#[async_trait]
impl RecipeCatalog for ReqwestCatalogClient {
    async fn fetch_daily_plan(&self, target_calories: f64) -> Result<Vec<Candidate>, CatalogError> {
        let url = format!("{}/mealplanner/generate", self.base_url);
        let target = target_calories.round().to_string();

        #[derive(serde::Deserialize)]
        struct DailyPlanPayload {
            #[serde(default)]
            meals: Option<Vec<Candidate>>,
        }

        let payload: DailyPlanPayload = self
            .get_json(
                "daily_plan",
                &url,
                &[("timeFrame", "day"), ("targetCalories", target.as_str())],
            )
            .await?;
        let meals = payload.meals.unwrap_or_default();
        tracing::debug!(count = meals.len(), target_calories, "fetched daily plan");
        Ok(meals)
    }

    async fn fetch_recipe_detail(&self, id: u64) -> Result<RecipeDetail, CatalogError> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);
        let mut detail: RecipeDetail = self
            .get_json("recipe_detail", &url, &[("includeNutrition", "true")])
            .await?;
        if detail.id == 0 {
            detail.id = id;
        }
        Ok(detail)
    }
}
