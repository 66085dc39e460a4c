use serde::Deserialize;

/// Public base URL of the BCRA "Central de Deudores" API.
pub const DEFAULT_BCRA_BASE_URL: &str = "https://api.bcra.gob.ar/CentralDeDeudores/v1.0";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bcra_base_url: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            bcra_base_url: std::env::var("BCRA_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map_or_else(
                    || Ok(DEFAULT_BCRA_BASE_URL.to_string()),
                    |raw| {
                        let parsed = url::Url::parse(&raw).map_err(|e| {
                            anyhow::anyhow!("BCRA_BASE_URL is not a valid URL: {}", e)
                        })?;
                        if parsed.scheme() != "http" && parsed.scheme() != "https" {
                            anyhow::bail!("BCRA_BASE_URL must start with http:// or https://");
                        }
                        Ok(raw.trim_end_matches('/').to_string())
                    },
                )?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a valid number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_TTL_SECS must be a valid number"))?,
            cache_capacity: std::env::var("CACHE_CAPACITY")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_CAPACITY must be a valid number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("BCRA Base URL: {}", config.bcra_base_url);
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Bureau request timeout: {}s, cache TTL: {}s, cache capacity: {}",
            config.request_timeout_secs,
            config.cache_ttl_secs,
            config.cache_capacity
        );

        Ok(config)
    }
}
