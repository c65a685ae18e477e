use std::{str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Startup connection attempts before giving up.
    pub connect_attempts: u32,
    pub connect_backoff: Duration,
    pub acquire_timeout: Duration,
    pub run_migrations: bool,
}

/// Which service routers this process mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledServices {
    pub auth: bool,
    pub workshops: bool,
    pub booking: bool,
}

impl EnabledServices {
    pub fn all() -> Self {
        Self {
            auth: true,
            workshops: true,
            booking: true,
        }
    }
}

impl Default for EnabledServices {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for EnabledServices {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Self {
            auth: false,
            workshops: false,
            booking: false,
        };
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "auth" => out.auth = true,
                "workshops" => out.workshops = true,
                "booking" => out.booking = true,
                "all" => out = Self::all(),
                other => anyhow::bail!("unknown service `{other}`"),
            }
        }
        if !(out.auth || out.workshops || out.booking) {
            anyhow::bail!("no services enabled");
        }
        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub services: EnabledServices,
    /// Empty means permissive CORS.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            connect_attempts: env_or("DB_CONNECT_ATTEMPTS", 20),
            connect_backoff: Duration::from_secs(env_or("DB_CONNECT_BACKOFF_SECS", 3)),
            acquire_timeout: Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", 5)),
            run_migrations: env_or("RUN_MIGRATIONS", true),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "workshop-booking".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "workshop-booking-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 30),
        };
        let services = match std::env::var("APP_SERVICES") {
            Ok(v) => v.parse().context("invalid APP_SERVICES")?,
            Err(_) => EnabledServices::all(),
        };
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();
        Ok(Self {
            db,
            jwt,
            services,
            cors_allowed_origins,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
