use crate::CatalogError;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
    /// Per-request timeout. Always finite: one hung detail lookup would
    /// otherwise stall the whole plan generation.
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, CatalogError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api = get("SPOONACULAR_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CatalogError::Config("SPOONACULAR_API_KEY missing".into()))?;
        let base_url = get("SPOONACULAR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout = match get("SPOONACULAR_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    CatalogError::Config(format!("invalid SPOONACULAR_TIMEOUT_SECS: {raw}"))
                })?;
                if secs == 0 {
                    return Err(CatalogError::Config(
                        "SPOONACULAR_TIMEOUT_SECS must be greater than zero".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let max_retries = match get("SPOONACULAR_MAX_RETRIES") {
            Some(raw) => raw.parse().map_err(|_| {
                CatalogError::Config(format!("invalid SPOONACULAR_MAX_RETRIES: {raw}"))
            })?,
            None => 0,
        };

        Ok(Self {
            api_key: SecretString::new(api.into()),
            base_url,
            timeout,
            max_retries,
        })
    }
}
