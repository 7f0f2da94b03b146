use actix_web::{http::StatusCode, test};
use serde_json::Value;

mod common;

use mongodb::{options::ClientOptions, Client};
use std::{sync::Arc, time::Duration};
use wayfarer_api::services::{
    catalog_source::{Catalog, StaticCatalog},
    trip_service::{MongoTripStore, TripStore},
};

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(common::create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["catalog"]["status"], "ok");
    assert_eq!(
        body["services"]["catalog"]["details"],
        "static catalog with 8 destinations"
    );
    assert_eq!(body["services"]["trips"]["details"], "memory store");
}

#[actix_web::test]
async fn test_empty_catalog_is_a_warning_not_an_outage() {
    let app = test::init_service(common::create_app_with(Catalog::Static(
        StaticCatalog::default(),
    )))
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["services"]["catalog"]["status"], "warning");

    let req = test::TestRequest::get()
        .uri("/api/destinations?q=anything")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_unreachable_trip_store_degrades_health() {
    let mut options = ClientOptions::parse("mongodb://127.0.0.1:1")
        .await
        .expect("valid uri");
    options.server_selection_timeout = Some(Duration::from_millis(200));
    options.connect_timeout = Some(Duration::from_millis(200));
    let client = Client::with_options(options).expect("client builds without connecting");

    let app = test::init_service(common::create_app_with_stores(
        Catalog::Static(common::seed_catalog()),
        TripStore::Mongo(MongoTripStore::new(Arc::new(client))),
    ))
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["catalog"]["status"], "ok");
    assert_eq!(body["services"]["trips"]["status"], "error");
}
