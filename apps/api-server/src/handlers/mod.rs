//! HTTP handlers and route configuration.

mod analytics;
mod auth;
mod cep;
mod feed;
mod health;
mod likes;
mod listings;
mod uploads;

#[cfg(test)]
mod tests;

use actix_web::web;

pub use uploads::MAX_UPLOAD_BYTES;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/cep/{cep}", web::get().to(cep::lookup))
            .route("/analytics", web::post().to(analytics::capture))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Listings
            .route("/listings", web::get().to(feed::feed))
            .route("/listings", web::post().to(listings::create))
            .route("/listings/{id}", web::get().to(listings::detail))
            .route("/listings/{id}", web::put().to(listings::update))
            .route("/listings/{id}", web::delete().to(listings::delete))
            .route("/listings/{id}/sold", web::post().to(listings::toggle_sold))
            .route("/listings/{id}/renew", web::post().to(listings::renew))
            .route("/listings/{id}/like", web::post().to(likes::toggle))
            // Owner dashboard
            .route("/me/listings", web::get().to(listings::my_listings))
            // Image uploads
            .route("/uploads", web::post().to(uploads::upload)),
    );
}
