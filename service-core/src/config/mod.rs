use crate::catalog::ServiceDefinition;
use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub service_name: String,
    pub host: String,
    pub port: u16,
    pub ops_port: u16,
    pub log_level: String,
    /// OTLP collector; spans are only exported when this is set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Load configuration for `service`: catalog defaults, then an optional
    /// `configuration.*` file, then `APP__*` environment variables.
    pub fn load(service: &ServiceDefinition) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults(service)?
            .add_source(File::with_name("configuration").required(false))
            .add_source(Self::environment())
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builder seeded with the defaults derived from the catalog entry.
    pub fn defaults(
        service: &ServiceDefinition,
    ) -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(Cfg::builder()
            .set_default("service_name", service.name)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(service.default_port))?
            .set_default("ops_port", i64::from(service.default_ops_port))?
            .set_default("log_level", "info")?)
    }

    /// `APP__PORT`, `APP__OPS_PORT`, ... overrides.
    pub fn environment() -> Environment {
        Environment::with_prefix("APP").separator("__")
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.port != 0 && self.port == self.ops_port {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "port and ops_port must differ (both set to {})",
                self.port
            )));
        }
        if self.service_name.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "service_name must not be empty"
            )));
        }
        Ok(())
    }
}
