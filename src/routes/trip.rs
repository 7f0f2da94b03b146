use actix_web::{web, HttpResponse, Responder};
use bson::oid::ObjectId;
use log::error;
use serde::Deserialize;
use std::collections::HashMap;

use crate::{
    error::TripError,
    middleware::user_context::UserContext,
    models::{
        filter::SortDirection,
        trip::{TripInput, TripStatus},
    },
    services::{
        catalog_source::Catalog,
        trip_service::{
            filter_trips_by_status, resolve_destination_names, sort_trips, validate_trip_input,
            TripRepository, TripSortField, TripStore,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct TripListParams {
    status: Option<TripStatus>,
    sort: Option<TripSortField>,
    direction: Option<SortDirection>,
}

fn trip_failure(err: TripError) -> HttpResponse {
    match err {
        TripError::NotFound => HttpResponse::NotFound().body("Trip not found"),
        TripError::Validation(reason) => HttpResponse::BadRequest().body(reason),
        TripError::UnknownDestination(id) => {
            HttpResponse::UnprocessableEntity().body(format!("Unknown destination {}", id))
        }
        other => {
            error!("Trip store failure: {}", other);
            HttpResponse::InternalServerError().body("Failed to process trip.")
        }
    }
}

fn parse_trip_id(raw: &str) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(raw).map_err(|_| HttpResponse::BadRequest().body("Invalid ID"))
}

/*
    GET /api/trips
*/
pub async fn list(
    user: UserContext,
    store: web::Data<TripStore>,
    catalog: web::Data<Catalog>,
    params: web::Query<TripListParams>,
) -> impl Responder {
    let params = params.into_inner();
    let field = params.sort.unwrap_or_default();
    let mut trips = match store.list_for_user(&user.user_id).await {
        Ok(trips) => filter_trips_by_status(trips, params.status),
        Err(err) => return trip_failure(err),
    };

    let destination_names = if field == TripSortField::Destination {
        match resolve_destination_names(&trips, &catalog).await {
            Ok(names) => names,
            Err(err) => return trip_failure(err),
        }
    } else {
        HashMap::new()
    };

    sort_trips(
        &mut trips,
        field,
        params.direction.unwrap_or_default(),
        &destination_names,
    );
    HttpResponse::Ok().json(trips)
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id(
    user: UserContext,
    store: web::Data<TripStore>,
    path: web::Path<String>,
) -> impl Responder {
    let trip_id = match parse_trip_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match store.get(&user.user_id, &trip_id).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_failure(err),
    }
}

/*
    POST /api/trips
*/
pub async fn create(
    user: UserContext,
    store: web::Data<TripStore>,
    catalog: web::Data<Catalog>,
    input: web::Json<TripInput>,
) -> impl Responder {
    let input = input.into_inner();
    if let Err(err) = validate_trip_input(&input, &catalog).await {
        return trip_failure(err);
    }
    match store.create(&user.user_id, input).await {
        Ok(trip) => HttpResponse::Created().json(trip),
        Err(err) => trip_failure(err),
    }
}

/*
    PUT /api/trips/{id}
*/
pub async fn update(
    user: UserContext,
    store: web::Data<TripStore>,
    catalog: web::Data<Catalog>,
    path: web::Path<String>,
    input: web::Json<TripInput>,
) -> impl Responder {
    let trip_id = match parse_trip_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let input = input.into_inner();
    if let Err(err) = validate_trip_input(&input, &catalog).await {
        return trip_failure(err);
    }
    match store.update(&user.user_id, &trip_id, input).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => trip_failure(err),
    }
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete(
    user: UserContext,
    store: web::Data<TripStore>,
    path: web::Path<String>,
) -> impl Responder {
    let trip_id = match parse_trip_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match store.delete(&user.user_id, &trip_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => trip_failure(err),
    }
}
