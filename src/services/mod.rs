pub mod catalog_filter;
pub mod catalog_source;
pub mod destination_query;
pub mod trip_service;
