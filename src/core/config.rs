use super::tariff::{
    HolidaySet, PriceResolver, TariffTable, TierPrices, UnknownRoomTypePolicy,
    default_current_tiers, default_holidays, default_predicted_tiers,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PredictionServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_fallback_room_type() -> String {
    "standard".to_string()
}

impl Default for PredictionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: PredictionServiceConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_current_tiers")]
    pub room_types: BTreeMap<String, TierPrices>,
    #[serde(default = "default_predicted_tiers")]
    pub predicted_room_types: BTreeMap<String, TierPrices>,
    #[serde(default = "default_holidays")]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub unknown_room_type: UnknownRoomTypePolicy,
    #[serde(default = "default_fallback_room_type")]
    pub fallback_room_type: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: PredictionServiceConfig::default(),
            currency: default_currency(),
            room_types: default_current_tiers(),
            predicted_room_types: default_predicted_tiers(),
            holidays: default_holidays(),
            unknown_room_type: UnknownRoomTypePolicy::default(),
            fallback_room_type: default_fallback_room_type(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "hrm", "hrm")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolver over current rack rates.
    pub fn current_resolver(&self) -> PriceResolver {
        self.resolver(&self.room_types)
    }

    /// Resolver over the offline predicted rates.
    pub fn predicted_resolver(&self) -> PriceResolver {
        self.resolver(&self.predicted_room_types)
    }

    fn resolver(&self, tiers: &BTreeMap<String, TierPrices>) -> PriceResolver {
        let holidays = Arc::new(HolidaySet::new(self.holidays.iter().copied()));
        PriceResolver::new(TariffTable::from_tiers(tiers), holidays)
            .with_policy(self.unknown_room_type, &self.fallback_room_type)
    }
}
