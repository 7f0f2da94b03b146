use bson::doc;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::{options::FindOptions, Client, Collection};
use std::path::Path;
use std::sync::Arc;

use crate::error::CatalogError;
use crate::models::{
    catalog_record::{adapt_catalog, parse_catalog_json, CatalogRecord, PriceBasis},
    destination::{Destination, DestinationId},
    filter::FilterSpec,
};
use crate::services::{
    catalog_filter::{build_destination_filter, build_destination_sort},
    destination_query::{filter_destinations, find_destination},
};

/// Where destinations come from. Every implementation hands back canonical
/// destinations and answers `query` with the same result set and ordering
/// `filter_destinations` would produce over its full catalog.
pub trait CatalogSource {
    async fn load_all(&self) -> Result<Vec<Destination>, CatalogError>;

    async fn query(&self, spec: &FilterSpec) -> Result<Vec<Destination>, CatalogError>;

    async fn find_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, CatalogError>;
}

/// Catalog held in memory, typically read once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    destinations: Arc<Vec<Destination>>,
}

impl StaticCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self {
            destinations: Arc::new(destinations),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>, basis: PriceBasis) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let destinations = parse_catalog_json(&raw, basis)?;
        info!(
            "Loaded {} destinations from {}",
            destinations.len(),
            path.display()
        );
        Ok(Self::new(destinations))
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl CatalogSource for StaticCatalog {
    async fn load_all(&self) -> Result<Vec<Destination>, CatalogError> {
        Ok(self.destinations.to_vec())
    }

    async fn query(&self, spec: &FilterSpec) -> Result<Vec<Destination>, CatalogError> {
        Ok(filter_destinations(&self.destinations, spec))
    }

    async fn find_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, CatalogError> {
        Ok(find_destination(&self.destinations, id).cloned())
    }
}

/// Catalog living in the remote record store.
#[derive(Clone)]
pub struct MongoCatalog {
    client: Arc<Client>,
    basis: PriceBasis,
}

impl MongoCatalog {
    pub const DATABASE: &'static str = "Catalog";
    pub const COLLECTION: &'static str = "Destination";

    pub fn new(client: Arc<Client>, basis: PriceBasis) -> Self {
        Self { client, basis }
    }

    fn collection(&self) -> Collection<CatalogRecord> {
        self.client
            .database(Self::DATABASE)
            .collection(Self::COLLECTION)
    }

    pub async fn ping(&self) -> Result<(), CatalogError> {
        self.client
            .database(Self::DATABASE)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

impl CatalogSource for MongoCatalog {
    async fn load_all(&self) -> Result<Vec<Destination>, CatalogError> {
        let cursor = self.collection().find(doc! {}).await?;
        let records: Vec<CatalogRecord> = cursor.try_collect().await?;
        Ok(adapt_catalog(records, self.basis))
    }

    async fn query(&self, spec: &FilterSpec) -> Result<Vec<Destination>, CatalogError> {
        let filter = build_destination_filter(spec, self.basis);
        debug!("Destination filter: {:?}", filter);

        let mut options = FindOptions::default();
        options.sort = build_destination_sort(spec, self.basis);

        let cursor = self.collection().find(filter).with_options(options).await?;
        let records: Vec<CatalogRecord> = cursor.try_collect().await?;
        let candidates = adapt_catalog(records, self.basis);

        // The store narrows the candidate set; the engine has the final say so
        // both paths agree on edge cases and ordering.
        Ok(filter_destinations(&candidates, spec))
    }

    async fn find_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, CatalogError> {
        let mut keys = vec![doc! { "Id": id.as_str() }, doc! { "id": id.as_str() }];
        if let Ok(n) = id.as_str().parse::<i64>() {
            keys.push(doc! { "Id": n });
            keys.push(doc! { "id": n });
        }
        if let Ok(oid) = bson::oid::ObjectId::parse_str(id.as_str()) {
            keys.push(doc! { "_id": oid });
        }

        match self.collection().find_one(doc! { "$or": keys }).await? {
            Some(record) => record.into_destination(self.basis).map(Some),
            None => Ok(None),
        }
    }
}

/// Catalog selected at startup.
#[derive(Clone)]
pub enum Catalog {
    Static(StaticCatalog),
    Mongo(MongoCatalog),
}

impl Catalog {
    pub fn kind(&self) -> &'static str {
        match self {
            Catalog::Static(_) => "static",
            Catalog::Mongo(_) => "mongodb",
        }
    }
}

impl CatalogSource for Catalog {
    async fn load_all(&self) -> Result<Vec<Destination>, CatalogError> {
        match self {
            Catalog::Static(catalog) => catalog.load_all().await,
            Catalog::Mongo(catalog) => catalog.load_all().await,
        }
    }

    async fn query(&self, spec: &FilterSpec) -> Result<Vec<Destination>, CatalogError> {
        match self {
            Catalog::Static(catalog) => catalog.query(spec).await,
            Catalog::Mongo(catalog) => catalog.query(spec).await,
        }
    }

    async fn find_by_id(&self, id: &DestinationId) -> Result<Option<Destination>, CatalogError> {
        match self {
            Catalog::Static(catalog) => catalog.find_by_id(id).await,
            Catalog::Mongo(catalog) => catalog.find_by_id(id).await,
        }
    }
}
