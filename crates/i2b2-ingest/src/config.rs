//! YAML configuration loading.
//!
//! The historical layout is a list whose first element holds an `etl`
//! mapping:
//!
//! ```yaml
//! - etl:
//!     varname: VARNAME
//!     patientid: SUBJID
//! ```
//!
//! A bare `etl` mapping, or the settings mapping itself, is accepted too.

use std::path::Path;

use i2b2_model::{ConfigError, EtlConfig};
use serde_yaml::Value;
use tracing::debug;

const ETL_SECTION: &str = "etl";

pub fn load_config(path: &Path) -> Result<EtlConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text).map_err(|error| match error {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;
    debug!(path = %path.display(), datemode = config.datemode, "loaded config");
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<EtlConfig, ConfigError> {
    let document: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    let section = etl_section(document)?;
    let config: EtlConfig = serde_yaml::from_value(section).map_err(parse_error)?;
    config.validate()?;
    Ok(config)
}

fn etl_section(document: Value) -> Result<Value, ConfigError> {
    let document = match document {
        Value::Sequence(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::missing("etl", "config list is empty"))?,
        other => other,
    };
    match document {
        Value::Mapping(mut mapping) => match mapping.remove(ETL_SECTION) {
            Some(section) => Ok(section),
            None => Ok(Value::Mapping(mapping)),
        },
        _ => Err(ConfigError::missing("etl", "config is not a mapping")),
    }
}

fn parse_error(error: serde_yaml::Error) -> ConfigError {
    ConfigError::Parse {
        path: Default::default(),
        message: error.to_string(),
    }
}
