use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Inclusive price window. Serialized as a `[min, max]` pair, the shape range
/// sliders post.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Only an upper bound, as the "max budget" selector sends it.
    pub fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// Endpoints in ascending order. Sliders can momentarily cross while
    /// dragging; a crossed range is read as the same range un-crossed.
    pub fn normalized(&self) -> (f64, f64) {
        if self.min > self.max {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        }
    }

    /// A missing price is never in range.
    pub fn contains(&self, price: Option<f64>) -> bool {
        let (lo, hi) = self.normalized();
        match price {
            Some(p) => p >= lo && p <= hi,
            None => false,
        }
    }
}

impl From<(f64, f64)> for PriceRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<PriceRange> for (f64, f64) {
    fn from(range: PriceRange) -> Self {
        (range.min, range.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Price,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// One query against a destination catalog. Every field defaults to its
/// inactive form, so `FilterSpec::default()` (or `{}` over the wire) matches
/// the whole catalog in catalog order.
///
/// Only a JSON object is accepted on the way in; arrays and scalars are an
/// invalid shape rather than positional fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Case-insensitive substring over name, location, country and description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Zero or absent disables the rating floor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub regions: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub activities: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl Serialize for FilterSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FilterSpec::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            fields @ Value::Object(_) => FilterSpec::deserialize(fields).map_err(de::Error::custom),
            _ => Err(de::Error::custom("filter must be a JSON object")),
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = activities.into_iter().map(Into::into).collect();
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder::new(field, direction));
        self
    }

    /// Lowercased search needle, or `None` when text search is inactive.
    pub fn search_needle(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Rating floor, or `None` when it is absent, zero, negative or NaN.
    pub fn rating_floor(&self) -> Option<f64> {
        self.min_rating.filter(|r| *r > 0.0)
    }

    /// Number of active predicate groups; sorting does not count.
    pub fn active_filter_count(&self) -> usize {
        [
            self.search_needle().is_some(),
            !self.regions.is_empty(),
            !self.categories.is_empty(),
            !self.activities.is_empty(),
            self.price_range.is_some(),
            self.rating_floor().is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_filter_count() == 0
    }
}
