use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use taskrank_core::params::DEFAULT_PRECISION;
use taskrank_core::{Directions, RankError, RankParams, Weights};

use crate::state::ensure_taskrank_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub clock: ClockSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSection {
    /// Raw weight spec, e.g. "0.2,0.2,0.6".
    pub weights: String,
    /// Raw direction spec, e.g. "max,max,min".
    pub directions: String,
    /// Decimal places kept in scores.
    pub precision: u32,
    /// Reject direction tokens other than max/min instead of reading them as max.
    pub strict_directions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSection {
    /// IANA zone used to resolve "now" and deadline midnights.
    pub timezone: String,
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            weights: "0.2,0.2,0.6".to_string(),
            directions: "max,max,min".to_string(),
            precision: DEFAULT_PRECISION,
            strict_directions: false,
        }
    }
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl RankingSection {
    /// Resolve ranking parameters, letting command-line specs override the file.
    pub fn rank_params(
        &self,
        weights: Option<&str>,
        directions: Option<&str>,
    ) -> Result<RankParams, RankError> {
        let weights = Weights::parse(weights.unwrap_or(&self.weights))?;
        let spec = directions.unwrap_or(&self.directions);
        let directions = if self.strict_directions {
            Directions::parse_strict(spec)?
        } else {
            Directions::parse(spec)?
        };
        Ok(RankParams::new(weights, directions).with_precision(self.precision))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    if !p.exists() {
        println!("# {} not found; showing defaults", p.display());
    } else {
        println!("# {}", p.display());
    }
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
