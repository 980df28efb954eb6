//! City-specific configuration.
//!
//! Each deployment city carries a YAML file naming its crash data files,
//! time range, and the feature columns its map sources provide. The feature
//! lists drive which columns get dummy-encoded versus log-transformed, so
//! they live here rather than being hardcoded per city.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur loading a city configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A group of map-derived features, split by how they enter the model.
///
/// The mappings keep their YAML declaration order, which carries through to
/// the assembled feature lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureGroup {
    /// Categorical feature name to display label.
    #[serde(default)]
    pub categorical: Mapping,

    /// Continuous feature name to display label.
    #[serde(default)]
    pub continuous: Mapping,
}

/// A point-based data source with its own file and feature column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSource {
    /// Feature column name this source contributes.
    pub name: String,

    /// File the source is read from, if any.
    #[serde(default)]
    pub filename: Option<String>,

    /// "categorical" or "continuous"; absent means untyped default.
    #[serde(default)]
    pub feat_type: Option<String>,
}

/// The feature columns a configuration contributes, by treatment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureList {
    /// Features that get dummy-encoded.
    pub categorical: Vec<String>,

    /// Features that get log-transformed.
    pub continuous: Vec<String>,

    /// Untyped features passed through as-is.
    pub default: Vec<String>,
}

/// A city's configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityConfig {
    /// City name, e.g. "Boston, Massachusetts, USA".
    pub city: String,

    /// Inclusive start of the crash data range, if bounded.
    #[serde(default)]
    pub startdate: Option<String>,

    /// Inclusive end of the crash data range, if bounded.
    #[serde(default)]
    pub enddate: Option<String>,

    /// IANA timezone name, e.g. "America/New_York".
    pub timezone: String,

    /// Crash file names mapped to their per-file options.
    pub crashes_files: Mapping,

    /// Features drawn from OpenStreetMap.
    #[serde(default)]
    pub openstreetmap_features: Option<FeatureGroup>,

    /// Features drawn from Waze.
    #[serde(default)]
    pub waze_features: Option<FeatureGroup>,

    /// Features from other map layers.
    #[serde(default)]
    pub additional_map_features: Option<FeatureGroup>,

    /// Point-based data sources with their own files.
    #[serde(default)]
    pub data_source: Option<Vec<DataSource>>,

    /// Automated traffic recorder columns; always continuous.
    #[serde(default)]
    pub atr_cols: Option<Vec<String>>,
}

impl CityConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Collect the feature columns this configuration contributes.
    ///
    /// Map feature groups sort into categorical and continuous; point-based
    /// sources follow their `feat_type`, defaulting to untyped; ATR columns
    /// are always continuous. Names keep their declaration order, with
    /// repeats across groups kept once at first mention.
    pub fn feature_list(&self) -> FeatureList {
        let mut features = FeatureList::default();

        for group in [
            &self.openstreetmap_features,
            &self.waze_features,
            &self.additional_map_features,
        ]
        .into_iter()
        .flatten()
        {
            for name in group.categorical.keys().filter_map(Value::as_str) {
                push_unique(&mut features.categorical, name);
            }
            for name in group.continuous.keys().filter_map(Value::as_str) {
                push_unique(&mut features.continuous, name);
            }
        }

        for source in self.data_source.iter().flatten() {
            match source.feat_type.as_deref() {
                Some("categorical") => push_unique(&mut features.categorical, &source.name),
                Some("continuous") => push_unique(&mut features.continuous, &source.name),
                _ => push_unique(&mut features.default, &source.name),
            }
        }

        for name in self.atr_cols.iter().flatten() {
            push_unique(&mut features.continuous, name);
        }

        features
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|f| f == name) {
        list.push(name.to_string());
    }
}
