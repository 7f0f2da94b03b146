use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct categorical values of a full catalog, sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFacets {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub activities: BTreeSet<String>,
}
