use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::services::{catalog_source::Catalog, trip_service::TripStore};

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    catalog: web::Data<Catalog>,
    trips: web::Data<TripStore>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    health
        .services
        .insert("catalog".to_string(), check_catalog(&catalog).await);
    health
        .services
        .insert("trips".to_string(), check_trips(&trips).await);

    if health.services.values().any(|s| s.status == "error") {
        health.status = "degraded".to_string();
        return HttpResponse::ServiceUnavailable().json(health);
    }

    HttpResponse::Ok().json(health)
}

async fn check_catalog(catalog: &Catalog) -> ServiceStatus {
    match catalog {
        Catalog::Static(catalog) if catalog.is_empty() => ServiceStatus {
            status: "warning".to_string(),
            details: Some("static catalog is empty".to_string()),
        },
        Catalog::Static(catalog) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("static catalog with {} destinations", catalog.len())),
        },
        Catalog::Mongo(catalog) => match catalog.ping().await {
            Ok(_) => ServiceStatus {
                status: "ok".to_string(),
                details: Some("mongodb reachable".to_string()),
            },
            Err(e) => ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("mongodb ping failed: {}", e)),
            },
        },
    }
}

async fn check_trips(trips: &TripStore) -> ServiceStatus {
    match trips {
        TripStore::Memory(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} store", trips.kind())),
        },
        TripStore::Mongo(store) => match store.ping().await {
            Ok(_) => ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("{} store reachable", trips.kind())),
            },
            Err(e) => ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("trip store ping failed: {}", e)),
            },
        },
    }
}
