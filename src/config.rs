use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub admin_seed: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let secret = lookup("JWT_SECRET").context("JWT_SECRET is not set")?;
        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "storefront-api".to_string()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "storefront-client".to_string()),
            expires_minutes: lookup("JWT_EXPIRES_MINUTES")
                .and_then(|m| m.parse::<i64>().ok())
                .filter(|m| *m > 0)
                .unwrap_or(60),
        };

        let admin_seed = match (lookup("ADMIN_SEED_EMAIL"), lookup("ADMIN_SEED_PASSWORD")) {
            (Some(email), Some(password))
                if !email.trim().is_empty() && !password.trim().is_empty() =>
            {
                Some(AdminSeed { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            admin_seed,
        })
    }
}
