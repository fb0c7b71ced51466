//! Optional TOML configuration for the command line tool.
//!
//! ```toml
//! [solver]
//! initial_scale = 1.3
//! damping = 0.7
//! max_iterations = 20
//! tolerance = 0.01
//!
//! [calculation]
//! bracket_walk = "cascading"   # cascading | marginal
//!
//! [logging]
//! level = "info"
//! file = "payroll.log"
//! ```
//!
//! Every key is optional. Command line flags are applied on top of the
//! loaded file by the caller.

use std::path::{Path, PathBuf};

use payroll_core::calculations::{BracketWalk, SolverConfig, SolverConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid solver settings: {0}")]
    Solver(#[from] SolverConfigError),

    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    pub bracket_walk: BracketWalk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append-mode log file. Logs go to stderr only when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    pub solver: SolverConfig,
    pub calculation: CalculationConfig,
    pub logging: LoggingConfig,
}

impl PayrollConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading payroll config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::LogLevel(self.logging.level.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PayrollConfig::from_toml_str("").expect("valid config");

        assert_eq!(config, PayrollConfig::default());
        assert_eq!(config.solver.max_iterations, 20);
        assert_eq!(config.calculation.bracket_walk, BracketWalk::Cascading);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = PayrollConfig::from_toml_str(
            r#"
            [solver]
            max_iterations = 60

            [calculation]
            bracket_walk = "marginal"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.solver.max_iterations, 60);
        assert_eq!(config.solver.damping, dec!(0.7));
        assert_eq!(config.calculation.bracket_walk, BracketWalk::Marginal);
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn unknown_bracket_walk_is_a_parse_error() {
        let err = PayrollConfig::from_toml_str("[calculation]\nbracket_walk = \"flat\"")
            .expect_err("unknown walk");

        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let err = PayrollConfig::from_toml_str("[solver]\nmax_iterations = 0")
            .expect_err("zero iterations");

        assert!(matches!(err, ConfigError::Solver(SolverConfigError::ZeroIterations)));
    }

    #[test]
    fn blank_log_level_is_rejected() {
        let err = PayrollConfig::from_toml_str("[logging]\nlevel = \" \"").expect_err("blank level");

        assert!(matches!(err, ConfigError::LogLevel(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PayrollConfig::load(Path::new("no/such/payroll.toml")).expect_err("missing");

        let ConfigError::Read { path, .. } = err else {
            panic!("expected Read error, got {err:?}");
        };
        assert_eq!(path, PathBuf::from("no/such/payroll.toml"));
    }
}
