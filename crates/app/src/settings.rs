//! Handles settings for the application. Configuration is read from
//! `settings.toml` in the working directory and can be overridden with
//! `STOREKEEP__<SECTION>__<KEY>` environment variables.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! database = { sqlite = "storekeep.db" }
//! bind = "0.0.0.0"
//! port = 3000
//!
//! [ledger]
//! revenue_reversal = "current_price"
//! ```
use config::{Config, ConfigError, Environment, File};
use engine::RevenueReversal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Default, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub revenue_reversal: RevenueReversal,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub ledger: Ledger,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("STOREKEEP").separator("__"))
                .build()?,
        )
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        Settings::from_config(config).unwrap()
    }

    #[test]
    fn full_settings() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            database = { sqlite = "shop.db" }
            bind = "0.0.0.0"
            port = 8080

            [ledger]
            revenue_reversal = "sale_price"
            "#,
        );

        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "shop.db"));
        assert_eq!(server.port, 8080);
        assert_eq!(settings.ledger.revenue_reversal, RevenueReversal::SalePrice);
    }

    #[test]
    fn defaults() {
        let settings = parse(
            r#"
            [server]
            database = "memory"
            "#,
        );

        assert_eq!(settings.app.level, "info");
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Memory));
        assert_eq!(server.port, 3000);
        assert_eq!(
            settings.ledger.revenue_reversal,
            RevenueReversal::CurrentPrice
        );
    }
}
