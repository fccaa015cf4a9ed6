use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BREAKPOINT_TOLERANCE: f64 = 1e-10;
const DEFAULT_APPROX_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    JsonParseError(#[from] serde_json::Error),
    #[error("invalid tolerance '{name}': {value}")]
    InvalidTolerance {
        name: &'static str,
        value: f64
    }
}

fn default_breakpoint_tolerance() -> f64 {
    DEFAULT_BREAKPOINT_TOLERANCE
}

fn default_approx_tolerance() -> f64 {
    DEFAULT_APPROX_TOLERANCE
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default = "default_breakpoint_tolerance")]
    breakpoint_tolerance: f64,
    #[serde(default = "default_approx_tolerance")]
    approx_tolerance: f64
}

/// 分段多項式運算的數值容差
///
/// - `breakpoint_tolerance`：合併兩組 breakpoints 時，距離小於此值的點視為同一點；
///   兩者重疊區間短於此值時視為 domain 不相容
/// - `approx_tolerance`：`is_approx_with` 使用的係數容差
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Configuration {
    breakpoint_tolerance: f64,
    approx_tolerance: f64
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            breakpoint_tolerance: DEFAULT_BREAKPOINT_TOLERANCE,
            approx_tolerance: DEFAULT_APPROX_TOLERANCE
        }
    }
}

impl Configuration {
    pub fn new(breakpoint_tolerance: f64, approx_tolerance: f64) -> Result<Configuration, ConfigurationError> {
        check_tolerance("breakpoint_tolerance", breakpoint_tolerance)?;
        check_tolerance("approx_tolerance", approx_tolerance)?;
        Ok(Configuration { breakpoint_tolerance, approx_tolerance })
    }

    pub fn breakpoint_tolerance(&self) -> f64 {
        self.breakpoint_tolerance
    }

    pub fn approx_tolerance(&self) -> f64 {
        self.approx_tolerance
    }

    pub fn from_json_value(json_value: serde_json::Value) -> Result<Configuration, ConfigurationError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_value(json_value)?;
        Configuration::new(json_prop.breakpoint_tolerance, json_prop.approx_tolerance)
    }

    pub fn from_reader(file_path: &str) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        log::debug!("loaded configuration from {}", file_path);
        Configuration::from_json_value(json_value)
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidTolerance { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Configuration::from_json_value(json!({})).unwrap();
        assert_eq!(config, Configuration::default());

        let config = Configuration::from_json_value(json!({"approx_tolerance": 1e-4})).unwrap();
        assert_eq!(config.approx_tolerance(), 1e-4);
        assert_eq!(config.breakpoint_tolerance(), DEFAULT_BREAKPOINT_TOLERANCE);
    }

    #[test]
    fn rejects_negative_tolerance() {
        let result = Configuration::from_json_value(json!({"breakpoint_tolerance": -1.0}));
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTolerance { name: "breakpoint_tolerance", .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let result = Configuration::from_json_value(json!({"approx_tolerance": "tight"}));
        assert!(matches!(result, Err(ConfigurationError::JsonParseError(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Configuration::from_reader("/nonexistent/polytraj/config.json");
        assert!(matches!(result, Err(ConfigurationError::IOError(_))));
    }
}
