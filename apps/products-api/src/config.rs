//! Configuration for Products API

use amqp_bus::AmqpConfig;
use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub amqp: AmqpConfig,
    /// Base URL of the external category service
    pub category_service_url: String,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let postgres = PostgresConfig::from_env()?;
        let amqp = AmqpConfig::from_env()?;

        let category_service_url =
            env_or_default("CATEGORY_SERVICE_URL", "https://localhost:7286");

        Ok(Self {
            app: app_info!(),
            server,
            postgres,
            amqp,
            category_service_url,
            environment,
        })
    }
}
