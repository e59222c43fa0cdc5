use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration, read from a JSON file.
///
/// ```json
/// {
///   "database": { "path": "otp.sqlite" },
///   "tables": {
///     "radial_dose": "source_files/v2r_ESTRO_radialDose.csv",
///     "anisotropy": "source_files/v2r_ESTRO_anisotropyFunction.csv"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tables: TablesConfig,
}

/// Where the treatment planning database lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Locations of the source lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_radial_dose")]
    pub radial_dose: PathBuf,
    #[serde(default = "default_anisotropy")]
    pub anisotropy: PathBuf,
}

fn default_radial_dose() -> PathBuf {
    PathBuf::from("source_files/v2r_ESTRO_radialDose.csv")
}
fn default_anisotropy() -> PathBuf {
    PathBuf::from("source_files/v2r_ESTRO_anisotropyFunction.csv")
}

impl Default for TablesConfig {
    fn default() -> Self {
        TablesConfig {
            radial_dose: default_radial_dose(),
            anisotropy: default_anisotropy(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
