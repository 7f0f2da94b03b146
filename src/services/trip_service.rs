use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use log::info;
use mongodb::{Client, Collection};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TripError;
use crate::models::{
    destination::DestinationId,
    filter::SortDirection,
    trip::{Trip, TripInput, TripStatus},
};
use crate::services::catalog_source::{Catalog, CatalogSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripSortField {
    #[default]
    Date,
    Name,
    Destination,
}

/// Reject inputs the trip form would have refused, and destinations the
/// catalog does not know.
pub async fn validate_trip_input(input: &TripInput, catalog: &Catalog) -> Result<(), TripError> {
    if input.name.trim().is_empty() {
        return Err(TripError::Validation("trip name is required".to_string()));
    }
    if input.start_date > input.end_date {
        return Err(TripError::Validation(
            "start date must not be after end date".to_string(),
        ));
    }
    if catalog.find_by_id(&input.destination_id).await?.is_none() {
        return Err(TripError::UnknownDestination(
            input.destination_id.to_string(),
        ));
    }
    Ok(())
}

pub fn filter_trips_by_status(trips: Vec<Trip>, status: Option<TripStatus>) -> Vec<Trip> {
    match status {
        Some(status) => trips.into_iter().filter(|t| t.status == status).collect(),
        None => trips,
    }
}

/// Look up the catalog name of every destination the trips point at. Ids the
/// catalog no longer knows are left out.
pub async fn resolve_destination_names(
    trips: &[Trip],
    catalog: &Catalog,
) -> Result<HashMap<DestinationId, String>, TripError> {
    let mut names = HashMap::new();
    for trip in trips {
        if names.contains_key(&trip.destination_id) {
            continue;
        }
        if let Some(destination) = catalog.find_by_id(&trip.destination_id).await? {
            names.insert(trip.destination_id.clone(), destination.name);
        }
    }
    Ok(names)
}

/// Stable sort. `Destination` orders by the case-folded destination name from
/// `destination_names`; trips whose destination has no name go last.
pub fn sort_trips(
    trips: &mut [Trip],
    field: TripSortField,
    direction: SortDirection,
    destination_names: &HashMap<DestinationId, String>,
) {
    let folded_name = |trip: &Trip| {
        destination_names
            .get(&trip.destination_id)
            .map(|name| name.to_lowercase())
    };

    trips.sort_by(|a, b| {
        let ordering = match field {
            TripSortField::Date => a.start_date.cmp(&b.start_date),
            TripSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            TripSortField::Destination => match (folded_name(a), folded_name(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Trip persistence keyed by owner. A trip belonging to someone else behaves
/// exactly like a missing one.
pub trait TripRepository {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Trip>, TripError>;

    async fn get(&self, user_id: &str, trip_id: &ObjectId) -> Result<Trip, TripError>;

    async fn create(&self, user_id: &str, input: TripInput) -> Result<Trip, TripError>;

    async fn update(
        &self,
        user_id: &str,
        trip_id: &ObjectId,
        input: TripInput,
    ) -> Result<Trip, TripError>;

    async fn delete(&self, user_id: &str, trip_id: &ObjectId) -> Result<(), TripError>;
}

#[derive(Debug, Default)]
pub struct MemoryTripStore {
    trips: RwLock<Vec<Trip>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TripRepository for MemoryTripStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Trip>, TripError> {
        let trips = self.trips.read().await;
        let mut owned: Vec<Trip> = trips
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        sort_trips(
            &mut owned,
            TripSortField::Date,
            SortDirection::Asc,
            &HashMap::new(),
        );
        Ok(owned)
    }

    async fn get(&self, user_id: &str, trip_id: &ObjectId) -> Result<Trip, TripError> {
        let trips = self.trips.read().await;
        trips
            .iter()
            .find(|t| t.id.as_ref() == Some(trip_id) && t.user_id == user_id)
            .cloned()
            .ok_or(TripError::NotFound)
    }

    async fn create(&self, user_id: &str, input: TripInput) -> Result<Trip, TripError> {
        let mut trip = Trip::from_input(user_id, input);
        trip.id = Some(ObjectId::new());
        self.trips.write().await.push(trip.clone());
        Ok(trip)
    }

    async fn update(
        &self,
        user_id: &str,
        trip_id: &ObjectId,
        input: TripInput,
    ) -> Result<Trip, TripError> {
        let mut trips = self.trips.write().await;
        let trip = trips
            .iter_mut()
            .find(|t| t.id.as_ref() == Some(trip_id) && t.user_id == user_id)
            .ok_or(TripError::NotFound)?;
        trip.apply(input);
        Ok(trip.clone())
    }

    async fn delete(&self, user_id: &str, trip_id: &ObjectId) -> Result<(), TripError> {
        let mut trips = self.trips.write().await;
        let before = trips.len();
        trips.retain(|t| !(t.id.as_ref() == Some(trip_id) && t.user_id == user_id));
        if trips.len() == before {
            return Err(TripError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoTripStore {
    client: Arc<Client>,
}

impl MongoTripStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    const DATABASE: &'static str = "Travelers";
    const COLLECTION: &'static str = "Trips";

    fn collection(&self) -> Collection<Trip> {
        self.client
            .database(Self::DATABASE)
            .collection(Self::COLLECTION)
    }

    pub async fn ping(&self) -> Result<(), TripError> {
        self.client
            .database(Self::DATABASE)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

impl TripRepository for MongoTripStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Trip>, TripError> {
        let cursor = self
            .collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "start_date": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get(&self, user_id: &str, trip_id: &ObjectId) -> Result<Trip, TripError> {
        self.collection()
            .find_one(doc! { "_id": *trip_id, "user_id": user_id })
            .await?
            .ok_or(TripError::NotFound)
    }

    async fn create(&self, user_id: &str, input: TripInput) -> Result<Trip, TripError> {
        let mut trip = Trip::from_input(user_id, input);
        let result = self.collection().insert_one(&trip).await?;
        trip.id = result.inserted_id.as_object_id();
        info!("Created trip {:?} for user {}", trip.id, user_id);
        Ok(trip)
    }

    async fn update(
        &self,
        user_id: &str,
        trip_id: &ObjectId,
        input: TripInput,
    ) -> Result<Trip, TripError> {
        let mut trip = self.get(user_id, trip_id).await?;
        trip.apply(input);
        self.collection()
            .replace_one(doc! { "_id": *trip_id, "user_id": user_id }, &trip)
            .await?;
        Ok(trip)
    }

    async fn delete(&self, user_id: &str, trip_id: &ObjectId) -> Result<(), TripError> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": *trip_id, "user_id": user_id })
            .await?;
        if result.deleted_count == 0 {
            return Err(TripError::NotFound);
        }
        Ok(())
    }
}

/// Trip store selected at startup.
pub enum TripStore {
    Memory(MemoryTripStore),
    Mongo(MongoTripStore),
}

impl TripStore {
    pub fn kind(&self) -> &'static str {
        match self {
            TripStore::Memory(_) => "memory",
            TripStore::Mongo(_) => "mongodb",
        }
    }
}

impl TripRepository for TripStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Trip>, TripError> {
        match self {
            TripStore::Memory(store) => store.list_for_user(user_id).await,
            TripStore::Mongo(store) => store.list_for_user(user_id).await,
        }
    }

    async fn get(&self, user_id: &str, trip_id: &ObjectId) -> Result<Trip, TripError> {
        match self {
            TripStore::Memory(store) => store.get(user_id, trip_id).await,
            TripStore::Mongo(store) => store.get(user_id, trip_id).await,
        }
    }

    async fn create(&self, user_id: &str, input: TripInput) -> Result<Trip, TripError> {
        match self {
            TripStore::Memory(store) => store.create(user_id, input).await,
            TripStore::Mongo(store) => store.create(user_id, input).await,
        }
    }

    async fn update(
        &self,
        user_id: &str,
        trip_id: &ObjectId,
        input: TripInput,
    ) -> Result<Trip, TripError> {
        match self {
            TripStore::Memory(store) => store.update(user_id, trip_id, input).await,
            TripStore::Mongo(store) => store.update(user_id, trip_id, input).await,
        }
    }

    async fn delete(&self, user_id: &str, trip_id: &ObjectId) -> Result<(), TripError> {
        match self {
            TripStore::Memory(store) => store.delete(user_id, trip_id).await,
            TripStore::Mongo(store) => store.delete(user_id, trip_id).await,
        }
    }
}
