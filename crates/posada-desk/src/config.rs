use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::billing::RateCard;

/// Hourly prices by room type, with per-room overrides applied elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateConfig {
    pub normal_hourly: Decimal,
    pub jacuzzi_hourly: Decimal,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            normal_hourly: dec!(100.00),
            jacuzzi_hourly: dec!(150.00),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeskConfig {
    pub database_url: String,
    /// Seconds a room stays in Cleaning before the lazy sweep releases it.
    pub release_delay_secs: u64,
    pub rates: RateConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://posada.db".to_string(),
            release_delay_secs: 60,
            rates: RateConfig::default(),
        }
    }
}

impl DeskConfig {
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let default_config = DeskConfig::default();
        let mut figment = Figment::from(Serialized::defaults(default_config));

        if let Some(path) = path_override {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        } else {
            let default_path = PathBuf::from("posada.toml");
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }

        figment = figment.merge(Env::prefixed("POSADA_").split("__"));

        figment
            .extract()
            .map_err(|e| anyhow!("Configuration error: {}", e))
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn rate_card(&self) -> RateCard {
        RateCard {
            normal_hourly: self.rates.normal_hourly,
            jacuzzi_hourly: self.rates.jacuzzi_hourly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = DeskConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let back: DeskConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back.release_delay_secs, 60);
        assert_eq!(back.rates.normal_hourly, dec!(100.00));
        assert_eq!(back.rates.jacuzzi_hourly, dec!(150.00));
    }
}
