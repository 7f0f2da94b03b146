pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use models::{
    destination::{Destination, DestinationId},
    facets::AvailableFacets,
    filter::{FilterSpec, PriceRange, SortDirection, SortField, SortOrder},
};
pub use services::destination_query::{derive_available_facets, filter_destinations};
