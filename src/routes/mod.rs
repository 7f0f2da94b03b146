use actix_web::web;

pub mod destination;
pub mod health;
pub mod trip;

/// Mount every route. Callers register `Catalog`, `TripStore` and
/// `AppConfig` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/destinations")
                        .route("", web::get().to(destination::list))
                        .route("/search", web::post().to(destination::search))
                        .route("/facets", web::get().to(destination::facets))
                        .route("/popular", web::get().to(destination::popular))
                        .route("/{id}", web::get().to(destination::get_by_id)),
                )
                .service(
                    web::scope("/trips")
                        .route("", web::get().to(trip::list))
                        .route("", web::post().to(trip::create))
                        .route("/{id}", web::get().to(trip::get_by_id))
                        .route("/{id}", web::put().to(trip::update))
                        .route("/{id}", web::delete().to(trip::delete)),
                ),
        );
}
