#![allow(dead_code)]

use actix_web::{web, App};
use std::path::Path;

use wayfarer_api::{
    config::AppConfig,
    models::catalog_record::PriceBasis,
    routes,
    services::{
        catalog_source::{Catalog, StaticCatalog},
        trip_service::{MemoryTripStore, TripStore},
    },
};

pub const ALICE: &str = "user-alice";
pub const BOB: &str = "user-bob";

pub fn seed_catalog() -> StaticCatalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/destinations.json");
    StaticCatalog::from_json_file(path, PriceBasis::Budget).expect("seed catalog loads")
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|_| None).expect("default config")
}

pub fn create_app_with(
    catalog: Catalog,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    create_app_with_stores(catalog, TripStore::Memory(MemoryTripStore::new()))
}

pub fn create_app_with_stores(
    catalog: Catalog,
    trips: TripStore,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(catalog))
        .app_data(web::Data::new(trips))
        .app_data(web::Data::new(test_config()))
        .configure(routes::configure)
}

pub fn create_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    create_app_with(Catalog::Static(seed_catalog()))
}
