use anyhow::Context;

/// Upper bound for token lifetimes: ten years.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET environment variable not set")?;
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        let ttl = |key: &str, default: i64| -> anyhow::Result<i64> {
            let Some(raw) = lookup(key) else {
                return Ok(default);
            };
            let minutes = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{key} must be a whole number of minutes"))?;
            anyhow::ensure!(
                (1..=MAX_TTL_MINUTES).contains(&minutes),
                "{key} must be between 1 and {MAX_TTL_MINUTES} minutes, got {minutes}"
            );
            Ok(minutes)
        };

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "user-api".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "user-api-clients".into()),
            ttl_minutes: ttl("JWT_TTL_MINUTES", 60 * 24)?,
            refresh_ttl_minutes: ttl("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
        };

        Ok(Self {
            database_url,
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            jwt,
        })
    }
}
