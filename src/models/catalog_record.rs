use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::models::destination::{Destination, DestinationId, RawId};

/// Which numeric column a catalog uses as the destination's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBasis {
    /// Total trip price.
    Price,
    /// Daily spend.
    #[default]
    Budget,
}

impl FromStr for PriceBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(PriceBasis::Price),
            "budget" => Ok(PriceBasis::Budget),
            other => Err(format!("expected `price` or `budget`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    Many(Vec<String>),
    /// Record stores keep multi-select values as "Beach,Romantic".
    Joined(String),
}

impl TagList {
    fn into_tags(self) -> Vec<String> {
        match self {
            TagList::Many(tags) => tags,
            TagList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActivityEntry {
    Tag(String),
    /// `{ name, description }`; only the name is a filterable tag.
    Detailed { name: String },
}

impl ActivityEntry {
    fn into_name(self) -> String {
        match self {
            ActivityEntry::Tag(name) => name,
            ActivityEntry::Detailed { name } => name,
        }
    }
}

/// Inbound destination row in whatever shape the catalog source produced.
/// Field names differ between catalogs (`price`/`budget`, `category`/`type`,
/// `Name`/`name`); all of them land here and get reconciled in
/// [`CatalogRecord::into_destination`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "Id", default)]
    id: Option<RawId>,
    /// Store-assigned key, used when the row carries no catalog id of its own.
    #[serde(rename = "_id", default)]
    object_id: Option<RawId>,
    #[serde(alias = "Name", default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    budget: Option<f64>,
    #[serde(default)]
    category: Option<TagList>,
    #[serde(rename = "type", default)]
    kind: Option<TagList>,
    #[serde(default)]
    activities: Option<Vec<ActivityEntry>>,
    #[serde(rename = "bestTime", default)]
    best_time: Option<String>,
    #[serde(rename = "travelPeriod", default)]
    travel_period: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(rename = "isPopular", default)]
    is_popular: Option<bool>,
    #[serde(default)]
    language: Option<String>,
    #[serde(alias = "currency1", default)]
    currency: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
}

impl CatalogRecord {
    /// Map this record onto the canonical [`Destination`].
    pub fn into_destination(self, basis: PriceBasis) -> Result<Destination, CatalogError> {
        let id = self
            .id
            .or(self.object_id)
            .map(RawId::into_text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::InvalidRecord {
                record: self.name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
                reason: "missing id".to_string(),
            })?;

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CatalogError::InvalidRecord {
                record: id.clone(),
                reason: "missing name".to_string(),
            })?;

        let raw_price = match basis {
            PriceBasis::Price => self.price,
            PriceBasis::Budget => self.budget,
        };

        let categories = normalize_tags(
            self.category
                .into_iter()
                .chain(self.kind)
                .flat_map(TagList::into_tags),
        );
        let activities = normalize_tags(
            self.activities
                .unwrap_or_default()
                .into_iter()
                .map(ActivityEntry::into_name),
        );

        Ok(Destination {
            id: DestinationId::new(id),
            name,
            location: non_blank(self.location),
            country: non_blank(self.country),
            region: non_blank(self.region),
            description: self.description.unwrap_or_default(),
            details: non_blank(self.details),
            image: non_blank(self.image),
            price: raw_price.filter(|p| p.is_finite() && *p >= 0.0),
            rating: clamp_rating(self.rating),
            categories,
            activities,
            best_time: non_blank(self.best_time).or_else(|| non_blank(self.travel_period)),
            duration: non_blank(self.duration),
            is_popular: self.is_popular.unwrap_or(false),
            language: non_blank(self.language),
            currency: non_blank(self.currency),
            timezone: non_blank(self.timezone),
        })
    }
}

/// Adapt a whole catalog. Rows without an id or name are skipped, and rows
/// after the first with an already-seen id are dropped, so the engine always
/// sees unique, named destinations.
pub fn adapt_catalog(records: Vec<CatalogRecord>, basis: PriceBasis) -> Vec<Destination> {
    let mut seen = HashSet::new();
    let mut catalog = Vec::with_capacity(records.len());

    for record in records {
        let destination = match record.into_destination(basis) {
            Ok(destination) => destination,
            Err(err) => {
                warn!("Skipping catalog record: {}", err);
                continue;
            }
        };
        if !seen.insert(destination.id.clone()) {
            warn!(
                "Dropping duplicate catalog record {} ({})",
                destination.id, destination.name
            );
            continue;
        }
        catalog.push(destination);
    }

    catalog
}

/// Parse a JSON catalog document: an array of record objects.
pub fn parse_catalog_json(raw: &str, basis: PriceBasis) -> Result<Vec<Destination>, CatalogError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let serde_json::Value::Array(rows) = value else {
        return Err(CatalogError::Malformed(
            "expected an array of destination records".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if !row.is_object() {
            return Err(CatalogError::Malformed(format!(
                "entry {} is not an object",
                index
            )));
        }
        let record: CatalogRecord = serde_json::from_value(row)
            .map_err(|e| CatalogError::Malformed(format!("entry {}: {}", index, e)))?;
        records.push(record);
    }

    Ok(adapt_catalog(records, basis))
}

fn clamp_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r.is_nan() => 0.0,
        Some(r) => r.clamp(0.0, 5.0),
        None => 0.0,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
