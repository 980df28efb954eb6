//! Feature-set bookkeeping.
//!
//! Two feature lists are carried through processing: the full set used by
//! tree models, and the linear-model set, which drops the first dummy of
//! each categorical so the intercept has room. Raw categorical and raw
//! continuous columns are removed once their processed forms exist.

use serde::{Deserialize, Serialize};

/// The tree-model and linear-model feature lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Full feature list (tree models)
    pub all: Vec<String>,
    /// Linear-model feature list
    pub linear: Vec<String>,
}

impl FeatureSet {
    /// Start from the raw segment feature columns.
    pub fn new(raw: &[String]) -> Self {
        Self {
            all: raw.to_vec(),
            linear: raw.to_vec(),
        }
    }

    /// Add a feature to both lists.
    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.linear.push(name.clone());
        self.all.push(name);
    }

    /// Add several features to both lists.
    pub fn extend(&mut self, names: &[String]) {
        for name in names {
            self.push(name.clone());
        }
    }

    /// Add the dummy columns of one categorical: all of them to the full
    /// set, all but the first to the linear set.
    pub fn extend_dummies(&mut self, names: &[String]) {
        self.all.extend(names.iter().cloned());
        self.linear.extend(names.iter().skip(1).cloned());
    }

    /// Remove the raw (pre-processing) columns from both lists, keeping
    /// order and dropping duplicates.
    pub fn remove_raw(&mut self, raw: &[String]) {
        let drop = |list: &mut Vec<String>| {
            let mut seen = std::collections::HashSet::new();
            list.retain(|name| !raw.contains(name) && seen.insert(name.clone()));
        };
        drop(&mut self.all);
        drop(&mut self.linear);
    }
}
