use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;

use crate::{
    config::AppConfig,
    error::CatalogError,
    models::{
        destination::DestinationId,
        filter::{FilterSpec, PriceRange, SortDirection, SortField, SortOrder},
    },
    services::{
        catalog_source::{Catalog, CatalogSource},
        destination_query::{derive_available_facets, popular_destinations},
    },
};

/// Query-string form of a [`FilterSpec`]. List values are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationQueryParams {
    pub q: Option<String>,
    pub regions: Option<String>,
    pub categories: Option<String>,
    pub activities: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl DestinationQueryParams {
    pub fn into_filter_spec(self) -> FilterSpec {
        let price_range = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some(PriceRange::new(min, max)),
            (None, Some(max)) => Some(PriceRange::up_to(max)),
            (Some(min), None) => Some(PriceRange::at_least(min)),
            (None, None) => None,
        };

        FilterSpec {
            search_query: self.q,
            price_range,
            min_rating: self.min_rating,
            regions: split_list(self.regions.as_deref()),
            categories: split_list(self.categories.as_deref()),
            activities: split_list(self.activities.as_deref()),
            sort: self
                .sort
                .map(|field| SortOrder::new(field, self.direction.unwrap_or_default())),
        }
    }
}

fn split_list<C>(raw: Option<&str>) -> C
where
    C: FromIterator<String>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    limit: Option<usize>,
}

fn catalog_failure(err: CatalogError, action: &str) -> HttpResponse {
    error!("Failed to {}: {}", action, err);
    match err {
        CatalogError::Store(_) => {
            HttpResponse::ServiceUnavailable().body("Destination catalog unavailable.")
        }
        _ => HttpResponse::InternalServerError().body(format!("Failed to {}.", action)),
    }
}

/*
    GET /api/destinations
*/
pub async fn list(
    catalog: web::Data<Catalog>,
    params: web::Query<DestinationQueryParams>,
) -> impl Responder {
    let spec = params.into_inner().into_filter_spec();
    match catalog.query(&spec).await {
        Ok(destinations) => HttpResponse::Ok().json(destinations),
        Err(err) => catalog_failure(err, "search destinations"),
    }
}

/*
    POST /api/destinations/search
*/
pub async fn search(catalog: web::Data<Catalog>, input: web::Json<FilterSpec>) -> impl Responder {
    match catalog.query(&input.into_inner()).await {
        Ok(destinations) => HttpResponse::Ok().json(destinations),
        Err(err) => catalog_failure(err, "search destinations"),
    }
}

/*
    GET /api/destinations/facets
*/
pub async fn facets(catalog: web::Data<Catalog>) -> impl Responder {
    match catalog.load_all().await {
        Ok(destinations) => HttpResponse::Ok().json(derive_available_facets(&destinations)),
        Err(err) => catalog_failure(err, "load facets"),
    }
}

/*
    GET /api/destinations/popular
*/
pub async fn popular(
    catalog: web::Data<Catalog>,
    config: web::Data<AppConfig>,
    params: web::Query<PopularParams>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(config.popular_limit);
    match catalog.load_all().await {
        Ok(destinations) => HttpResponse::Ok().json(popular_destinations(&destinations, limit)),
        Err(err) => catalog_failure(err, "load popular destinations"),
    }
}

/*
    GET /api/destinations/{id}
*/
pub async fn get_by_id(catalog: web::Data<Catalog>, path: web::Path<String>) -> impl Responder {
    let id = DestinationId::new(path.into_inner());
    match catalog.find_by_id(&id).await {
        Ok(Some(destination)) => HttpResponse::Ok().json(destination),
        Ok(None) => HttpResponse::NotFound().body("Destination not found"),
        Err(err) => catalog_failure(err, "load destination"),
    }
}
