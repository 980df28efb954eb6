//! Feature Registry
//!
//! Central registry of the engineered features. Allows lookup by name and
//! kind so the CLI can describe what the modeling table will contain.

use std::collections::HashMap;

/// Kinds of engineered features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Temporal crash-lag features aligned to the target week
    Lag,
    /// Static segment attributes (dummy-encoded or log-transformed)
    Static,
    /// External exposure sources (concern reports, ATR, TMC)
    Exposure,
    /// Features derived from the segment id itself
    Derived,
}

/// Feature metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Feature name (unique identifier, or family prefix for generated columns)
    pub name: &'static str,
    /// Feature kind
    pub kind: FeatureKind,
    /// Brief description of what the feature measures
    pub description: &'static str,
    /// Required column names in input data
    pub required_columns: &'static [&'static str],
}

/// Get all available feature info
pub fn available_features() -> Vec<FeatureInfo> {
    vec![
        // Lag features
        FeatureInfo {
            name: "pre_week",
            kind: FeatureKind::Lag,
            description: "Crash count in the week before the target week",
            required_columns: &["segment_id", "year", "week", "crash"],
        },
        FeatureInfo {
            name: "pre_month",
            kind: FeatureKind::Lag,
            description: "Crash count over the five weeks before the target week",
            required_columns: &["segment_id", "year", "week", "crash"],
        },
        FeatureInfo {
            name: "pre_quarter",
            kind: FeatureKind::Lag,
            description: "Crash count over the seventeen weeks before the target week",
            required_columns: &["segment_id", "year", "week", "crash"],
        },
        FeatureInfo {
            name: "avg_week",
            kind: FeatureKind::Lag,
            description: "Mean weekly crash count from week 1 up to the target week",
            required_columns: &["segment_id", "year", "week", "crash"],
        },
        // Static attribute families
        FeatureInfo {
            name: "dummies",
            kind: FeatureKind::Static,
            description: "Indicator columns per level of each categorical attribute",
            required_columns: &["segment_id"],
        },
        FeatureInfo {
            name: "log_continuous",
            kind: FeatureKind::Static,
            description: "ln(x + 1) of each continuous attribute (e.g. log_AADT)",
            required_columns: &["segment_id"],
        },
        // Exposure sources
        FeatureInfo {
            name: "concern",
            kind: FeatureKind::Exposure,
            description: "Max citizen concern reports over the base year",
            required_columns: &["segment_id", "year", "concern"],
        },
        FeatureInfo {
            name: "atr",
            kind: FeatureKind::Exposure,
            description: "Coalesced ATR speed and volume counts",
            required_columns: &["id"],
        },
        FeatureInfo {
            name: "tmc_conflict",
            kind: FeatureKind::Exposure,
            description: "Turning movement conflict count near the segment",
            required_columns: &["near_id"],
        },
        // Derived
        FeatureInfo {
            name: "intersection",
            kind: FeatureKind::Derived,
            description: "1 unless the segment id carries the mid-block 00 prefix",
            required_columns: &["segment_id"],
        },
    ]
}

/// Get features by kind
pub fn features_by_kind(kind: FeatureKind) -> Vec<FeatureInfo> {
    available_features()
        .into_iter()
        .filter(|f| f.kind == kind)
        .collect()
}

/// Get feature info by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features().into_iter().find(|f| f.name == name)
}

/// Count features by kind
pub fn count_by_kind() -> HashMap<FeatureKind, usize> {
    let mut counts = HashMap::new();
    for feature in available_features() {
        *counts.entry(feature.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_features_count() {
        assert_eq!(available_features().len(), 10);
    }

    #[test]
    fn test_features_by_kind() {
        assert_eq!(features_by_kind(FeatureKind::Lag).len(), 4);
        assert_eq!(features_by_kind(FeatureKind::Static).len(), 2);
        assert_eq!(features_by_kind(FeatureKind::Exposure).len(), 3);
        assert_eq!(features_by_kind(FeatureKind::Derived).len(), 1);
    }

    #[test]
    fn test_get_feature_info() {
        let info = get_feature_info("pre_quarter").unwrap();
        assert_eq!(info.kind, FeatureKind::Lag);
        assert!(info.required_columns.contains(&"week"));

        assert!(get_feature_info("nonexistent").is_none());
    }

    #[test]
    fn test_count_by_kind() {
        let counts = count_by_kind();
        assert_eq!(counts.get(&FeatureKind::Lag), Some(&4));
        assert_eq!(counts.get(&FeatureKind::Derived), Some(&1));
    }
}
