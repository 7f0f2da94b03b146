use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use wayfarer_api::{
    config::AppConfig,
    db,
    routes,
    services::{
        catalog_source::{Catalog, MongoCatalog, StaticCatalog},
        trip_service::{MemoryTripStore, MongoTripStore, TripStore},
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let (catalog, trips) = match &config.mongodb_uri {
        Some(uri) => {
            info!("Using MongoDB catalog and trip store");
            let client = db::mongo::create_mongo_client(uri).await.map_err(|e| {
                error!("Failed to create MongoDB client: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            (
                Catalog::Mongo(MongoCatalog::new(client.clone(), config.price_basis)),
                TripStore::Mongo(MongoTripStore::new(client)),
            )
        }
        None => {
            info!(
                "MONGODB_URI not set, serving {} with an in-memory trip store",
                config.catalog_path.display()
            );
            let catalog = StaticCatalog::from_json_file(&config.catalog_path, config.price_basis)
                .map_err(|e| {
                    error!("Failed to load catalog: {}", e);
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?;
            (
                Catalog::Static(catalog),
                TripStore::Memory(MemoryTripStore::new()),
            )
        }
    };

    let bind = (config.host.clone(), config.port);
    info!("Binding to {}:{}", bind.0, bind.1);

    let catalog = web::Data::new(catalog);
    let trips = web::Data::new(trips);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(catalog.clone())
            .app_data(trips.clone())
            .app_data(config.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
