pub mod catalog_record;
pub mod destination;
pub mod facets;
pub mod filter;
pub mod trip;
