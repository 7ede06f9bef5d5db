use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{Bounds, Predictor};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub bounds: Bounds,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimals shown for the predicted CGPA
    pub precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);

        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            tracing::info!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        let all = [
            b.min_grade,
            b.max_grade,
            b.min_credit,
            b.max_credit,
            b.grade_step,
            b.credit_step,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            bail!("bounds must be finite numbers");
        }
        if b.min_grade < 0.0 || b.min_grade >= b.max_grade {
            bail!(
                "grade bounds must satisfy 0 <= min < max (got {} and {})",
                b.min_grade,
                b.max_grade
            );
        }
        if b.min_credit <= 0.0 || b.min_credit >= b.max_credit {
            bail!(
                "credit bounds must satisfy 0 < min < max (got {} and {})",
                b.min_credit,
                b.max_credit
            );
        }
        if b.grade_step <= 0.0 || b.credit_step <= 0.0 {
            bail!("input steps must be positive");
        }
        if b.max_semesters == 0 {
            bail!("max_semesters must be at least 1");
        }
        if self.display.precision > 6 {
            bail!("display precision must be at most 6 decimals");
        }
        Ok(())
    }

    pub fn predictor(&self) -> Predictor {
        Predictor::new(self.bounds.clone()).with_precision(self.display.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bounds.min_credit, 0.01);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bounds]
            min_credit = 0.5

            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.bounds.min_credit, 0.5);
        assert_eq!(config.bounds.max_credit, 30.0);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.display.precision, 2);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = Config::default();
        config.bounds.min_grade = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_min_credit_rejected() {
        let mut config = Config::default();
        config.bounds.min_credit = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_semesters_rejected() {
        let mut config = Config::default();
        config.bounds.max_semesters = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/cgpa-predictor.toml").unwrap();
        assert_eq!(config.bounds, Bounds::default());
    }
}
