//! Runtime configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/craftflip/config.toml` (falling back
//! to `~/.config/craftflip/config.toml`), with `FLIP_*` environment
//! variables taking precedence. The karma conversion rate is always
//! supplied here; the analysis never derives it from market data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FlipError, Result};

/// How many karma points are worth one copper coin.
const DEFAULT_KARMA_PER_COIN: f64 = 35.0;

const DEFAULT_API_BASE: &str = "https://api.guildwars2.com/v2";

/// A per-item vendor/karma price correction, applied after the built-in
/// vendor table during `flip init`. The API does not expose vendor
/// inventories, so these are maintained by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverride {
    pub id: u32,
    #[serde(default)]
    pub vendor: Option<i64>,
    #[serde(default)]
    pub karma: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Karma points per copper coin; karma prices divide by this to
    /// become coin-equivalent.
    pub karma_per_coin: f64,
    pub api_base: String,
    /// Default profit floor for `flip scan`, in copper.
    pub min_profit: i64,
    #[serde(rename = "price_override")]
    pub price_overrides: Vec<PriceOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            karma_per_coin: DEFAULT_KARMA_PER_COIN,
            api_base: DEFAULT_API_BASE.to_string(),
            min_profit: 0,
            price_overrides: Vec::new(),
        }
    }
}

/// Path of the config file (~/.config/craftflip/config.toml or the XDG
/// equivalent).
pub fn config_path() -> PathBuf {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home).join("craftflip/config.toml")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config/craftflip/config.toml")
    } else {
        PathBuf::from(".config/craftflip/config.toml")
    }
}

impl Config {
    /// Load the config file if present, apply environment overrides,
    /// and validate. A missing file is the default config, not an error.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            toml::from_str(&text)
                .map_err(|e| FlipError::ConfigError(format!("{}: {e}", path.display())))?
        } else {
            Config::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(rate) = std::env::var("FLIP_KARMA_PER_COIN")
            && let Ok(rate) = rate.parse::<f64>()
        {
            self.karma_per_coin = rate;
        }
        if let Ok(base) = std::env::var("FLIP_API_BASE") {
            self.api_base = base;
        }
        if let Ok(floor) = std::env::var("FLIP_MIN_PROFIT")
            && let Ok(floor) = floor.parse::<i64>()
        {
            self.min_profit = floor;
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.karma_per_coin.is_finite() || self.karma_per_coin <= 0.0 {
            return Err(FlipError::ConfigError(format!(
                "karma_per_coin must be a positive number, got {}",
                self.karma_per_coin
            )));
        }
        if self.api_base.is_empty() {
            return Err(FlipError::ConfigError("api_base is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_karma_rate_rejected() {
        let config = Config {
            karma_per_coin: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str("karma_per_coin = 42.0").unwrap();
        assert_eq!(config.karma_per_coin, 42.0);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn parses_price_overrides() {
        let text = r#"
            [[price_override]]
            id = 19750
            vendor = 16

            [[price_override]]
            id = 12134
            karma = 77.0
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.price_overrides.len(), 2);
        assert_eq!(config.price_overrides[0].vendor, Some(16));
        assert_eq!(config.price_overrides[1].karma, Some(77.0));
    }
}
