use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::FilterParams;
use crate::models::ScoringWeights;
use crate::services::IngestLimits;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_freelancers_file")]
    pub freelancers_file: String,
    #[serde(default = "default_projects_file")]
    pub projects_file: String,
    #[serde(default = "default_availability_file")]
    pub availability_file: String,
    #[serde(default = "default_max_records")]
    pub max_freelancers: usize,
    #[serde(default = "default_max_records")]
    pub max_projects: usize,
    #[serde(default = "default_max_skills")]
    pub max_skills: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            freelancers_file: default_freelancers_file(),
            projects_file: default_projects_file(),
            availability_file: default_availability_file(),
            max_freelancers: default_max_records(),
            max_projects: default_max_records(),
            max_skills: default_max_skills(),
        }
    }
}

impl DataSettings {
    pub fn limits(&self) -> IngestLimits {
        IngestLimits {
            max_freelancers: self.max_freelancers,
            max_projects: self.max_projects,
            max_skills: self.max_skills,
        }
    }
}

fn default_data_dir() -> String { "data".to_string() }
fn default_freelancers_file() -> String { "freelancers.csv".to_string() }
fn default_projects_file() -> String { "projects.csv".to_string() }
fn default_availability_file() -> String { "availability.csv".to_string() }
fn default_max_records() -> usize { 100 }
fn default_max_skills() -> usize { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_filter_bits")]
    pub bits: usize,
    #[serde(default = "default_filter_hashes")]
    pub hashes: u32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            bits: default_filter_bits(),
            hashes: default_filter_hashes(),
        }
    }
}

impl FilterSettings {
    pub fn params(&self) -> FilterParams {
        FilterParams {
            bits: self.bits,
            hashes: self.hashes,
        }
    }
}

fn default_filter_bits() -> usize { 1024 }
fn default_filter_hashes() -> u32 { 3 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: u32,
    #[serde(default = "default_experience_weight")]
    pub experience: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            skills: config.skills,
            experience: config.experience,
        }
    }
}

fn default_skills_weight() -> u32 { 70 }
fn default_experience_weight() -> u32 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GIGMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GIGMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GIGMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GIGMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the plain `DATA_DIR` variable on top of the layered sources
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(data_dir) = std::env::var("DATA_DIR") {
        builder = builder.set_override("data.dir", data_dir)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.skills, 70);
        assert_eq!(weights.experience, 30);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_filter_and_limits() {
        let settings = Settings::default();
        assert_eq!(settings.filter.params(), FilterParams::default());
        assert_eq!(settings.data.limits(), IngestLimits::default());
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_load_from_toml() {
        let path = std::env::temp_dir().join(format!("gig-match-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[filter]\nbits = 2048\n\n[scoring.weights]\nskills = 60\nexperience = 40\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.filter.bits, 2048);
        assert_eq!(settings.filter.hashes, 3);
        assert_eq!(settings.scoring.weights.skills, 60);
        assert_eq!(settings.data.dir, "data");
    }
}
