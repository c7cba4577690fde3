use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::payroll::render::RenderOptions;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    /// MySQL URL. Without it the in-process store is used.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Seconds.
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Seeded on startup when missing
    pub admin_username: String,
    pub admin_password: String,

    // Payslip presentation
    pub org_name: String,
    pub org_address: Option<String>,
    pub currency_symbol: Option<String>,

    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: optional("DATABASE_URL"),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", 28_800)?, // 8 hours

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: var_or("API_PREFIX", "/api"),

            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password: var_or("ADMIN_PASSWORD", "admin123"),

            org_name: var_or("ORG_NAME", ""),
            org_address: optional("ORG_ADDRESS"),
            currency_symbol: optional("PAYSLIP_CURRENCY_SYMBOL"),

            log_dir: var_or("LOG_DIR", "logs"),
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            org_name: self.org_name.clone(),
            org_address: self.org_address.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank values are both treated as absent.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: 3600,
            rate_login_per_min: 1000,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            org_name: String::new(),
            org_address: None,
            currency_symbol: None,
            log_dir: "logs".to_string(),
        }
    }
}
