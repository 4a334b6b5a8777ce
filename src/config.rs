use anyhow::{Context, Result};
use chrono::Weekday;
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::scheduling::slots::parse_hhmm;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub shop: ShopConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Operating-hours rules the slot generator works from. All times are
/// minutes since midnight; HH:MM appears only in the environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    pub weekday_open_min: i64,
    pub weekday_close_min: i64,
    pub saturday_open_min: i64,
    pub saturday_close_min: i64,
    pub closed_weekday: Weekday,
    pub slot_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10), // Default value
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1), // Default value
        };

        // Shop operating hours
        let weekday_open_min = time_env("SHOP_OPEN_TIME", "08:00")?;
        let weekday_close_min = time_env("SHOP_CLOSE_TIME", "19:00")?;
        let saturday_open_min = time_env("SHOP_SATURDAY_OPEN_TIME", "08:00")?;
        let saturday_close_min = time_env("SHOP_SATURDAY_CLOSE_TIME", "16:00")?;

        let closed_weekday = env::var("SHOP_CLOSED_WEEKDAY")
            .unwrap_or_else(|_| "sunday".to_string())
            .parse::<Weekday>()
            .map_err(|_| anyhow::anyhow!("Failed to parse SHOP_CLOSED_WEEKDAY"))?;

        let slot_minutes: i64 = env::var("SHOP_SLOT_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Failed to parse SHOP_SLOT_MINUTES")?;
        if slot_minutes <= 0 {
            anyhow::bail!("SHOP_SLOT_MINUTES must be positive");
        }
        if weekday_open_min >= weekday_close_min || saturday_open_min >= saturday_close_min {
            anyhow::bail!("Shop opening time must precede closing time");
        }

        // App configuration
        let environment_str = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Barbershop Backend".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            shop: ShopConfig {
                weekday_open_min,
                weekday_close_min,
                saturday_open_min,
                saturday_close_min,
                closed_weekday,
                slot_minutes,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    #[allow(unused)]
    pub fn is_development(&self) -> bool {
        self.app.environment == Environment::Development
    }
}

fn time_env(name: &str, default: &str) -> Result<i64> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_hhmm(&raw).ok_or_else(|| anyhow::anyhow!("Failed to parse {} as HH:MM", name))
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
