//! Endpoint tests against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use bazar_core::ports::{PasswordService, TokenService};
use bazar_infra::FsBlobStore;
use bazar_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use bazar_infra::database::InMemoryStore;
use bazar_infra::geo::ViaCepClient;
use bazar_infra::rate_limit::{InMemoryRateLimiter, RateLimitConfig};

use crate::handlers::configure_routes;
use crate::state::AppState;

fn test_state() -> AppState {
    let store = InMemoryStore::new();
    let base_url = "http://localhost:8080/uploads".to_string();
    AppState {
        profiles: Arc::new(store.clone()),
        listings: Arc::new(store.clone()),
        likes: Arc::new(store.clone()),
        analytics: Arc::new(store),
        blobs: Arc::new(FsBlobStore::new(
            std::env::temp_dir().join("bazar-test-uploads"),
            base_url.clone(),
        )),
        postal: Arc::new(ViaCepClient::new()),
        limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 10_000,
            window: Duration::from_secs(60),
        })),
        uploads_base_url: base_url,
    }
}

async fn spawn_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "bazar-test".to_string(),
    }));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(token_service))
            .app_data(web::Data::new(password_service))
            .configure(configure_routes),
    )
    .await
}

async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": format!("{username}@example.com"),
            "password": "senha-segura",
            "username": username,
            "phone": "+5511999990000",
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["access_token"]
        .as_str()
        .expect("registration returns a token")
        .to_string()
}

fn listing_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Em bom estado",
        "price": "450.00",
        "category": "esportes",
        "cep": "01310100",
        "city": "São Paulo",
        "state": "SP",
        "image_urls": ["http://localhost:8080/uploads/u/l/0.jpg"],
    })
}

async fn create_listing(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    title: &str,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(listing_body(title))
        .to_request();
    test::call_and_read_body_json(app, req).await
}

#[actix_web::test]
async fn register_login_me_flow() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "maria");
    assert_eq!(me["plan"], "free");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "maria@example.com", "password": "senha-segura" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    assert!(login["access_token"].is_string());
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app(test_state()).await;
    register(&app, "maria").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "maria@example.com", "password": "chute-errado" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn create_then_read_round_trips() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    let created = create_listing(&app, &token, "Bicicleta aro 29").await;
    assert_eq!(created["status"], "active");

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{}", created["id"].as_str().unwrap()))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched["title"], "Bicicleta aro 29");
    assert_eq!(fetched["description"], "Em bom estado");
    assert_eq!(fetched["price"], "450.00");
    assert_eq!(fetched["category"], "esportes");
    assert_eq!(fetched["status"], "active");
    assert_eq!(fetched["images"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["profile"]["username"], "maria");
}

#[actix_web::test]
async fn fourth_listing_on_free_plan_is_quota_exceeded() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(listing_body(&format!("Anúncio número {i}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(listing_body("Um anúncio a mais"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Quota Exceeded");
    assert!(body["detail"].as_str().unwrap().contains("3 of 3"));

    // No row was persisted for the rejected create.
    let req = test::TestRequest::get()
        .uri("/api/me/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine["listings"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn short_title_is_rejected() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    let mut body = listing_body("Bike");
    body["title"] = json!("Bike");
    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn anonymous_feed_has_no_liked_flag() {
    let app = spawn_app(test_state()).await;
    let seller = register(&app, "vendedora").await;
    let buyer = register(&app, "compradora").await;
    let listing = create_listing(&app, &seller, "Violão clássico").await;

    // The buyer likes it, then the feed is read anonymously.
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/listings/{}/like",
            listing["id"].as_str().unwrap()
        ))
        .insert_header(("Authorization", format!("Bearer {buyer}")))
        .to_request();
    let like: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(like["liked"], true);

    let req = test::TestRequest::get().uri("/api/listings").to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    let items = feed["listings"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["likes_count"], 1);
    assert!(
        items[0].get("liked").is_none(),
        "anonymous responses must not carry like state"
    );
}

#[actix_web::test]
async fn authenticated_feed_scopes_liked_flags_to_the_viewer() {
    let app = spawn_app(test_state()).await;
    let seller = register(&app, "vendedora").await;
    let fan = register(&app, "fazinha").await;
    let passerby = register(&app, "passante").await;
    let listing = create_listing(&app, &seller, "Violão clássico").await;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/listings/{}/like",
            listing["id"].as_str().unwrap()
        ))
        .insert_header(("Authorization", format!("Bearer {fan}")))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {fan}")))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["listings"][0]["liked"], true);

    let req = test::TestRequest::get()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {passerby}")))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["listings"][0]["liked"], false);
}

#[actix_web::test]
async fn feed_hides_sold_listings() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;
    let keep = create_listing(&app, &token, "Fica no feed").await;
    let sold = create_listing(&app, &token, "Já vendido").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{}/sold", sold["id"].as_str().unwrap()))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/listings").to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    let items = feed["listings"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], keep["id"]);
}

#[actix_web::test]
async fn sold_toggle_round_trips_without_quota_check() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    // Fill the free quota, then un-sell must still succeed.
    let first = create_listing(&app, &token, "Primeiro anúncio").await;
    for i in 1..3 {
        create_listing(&app, &token, &format!("Anúncio número {i}")).await;
    }
    let id = first["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{id}/sold"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "sold");

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{id}/sold"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "active");
}

#[actix_web::test]
async fn only_the_owner_may_mutate_a_listing() {
    let app = spawn_app(test_state()).await;
    let owner = register(&app, "dona").await;
    let stranger = register(&app, "estranha").await;
    let listing = create_listing(&app, &owner, "Mesa de jantar").await;
    let id = listing["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{id}/sold"))
        .insert_header(("Authorization", format!("Bearer {stranger}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {stranger}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn like_toggle_twice_restores_original_state() {
    let app = spawn_app(test_state()).await;
    let seller = register(&app, "vendedora").await;
    let buyer = register(&app, "compradora").await;
    let listing = create_listing(&app, &seller, "Cadeira gamer").await;
    let uri = format!("/api/listings/{}/like", listing["id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {buyer}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["liked"], true);
    assert_eq!(body["likes_count"], 1);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {buyer}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["liked"], false);
    assert_eq!(body["likes_count"], 0);
}

#[actix_web::test]
async fn analytics_events_accumulate_into_click_counts() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;
    let listing = create_listing(&app, &token, "Notebook usado").await;
    let id = listing["id"].as_str().unwrap();

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/analytics")
            .set_json(json!({ "listingId": id, "action": "whatsapp_click" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["whatsapp_clicks"], 2);
}

#[actix_web::test]
async fn analytics_rejects_bad_input() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;
    let listing = create_listing(&app, &token, "Notebook usado").await;

    let req = test::TestRequest::post()
        .uri("/api/analytics")
        .set_json(json!({
            "listingId": listing["id"],
            "action": "teleport",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/analytics")
        .set_json(json!({
            "listingId": uuid::Uuid::new_v4(),
            "action": "whatsapp_click",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn renew_reactivates_and_pushes_the_deadline() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;
    let listing = create_listing(&app, &token, "Ventilador de teto").await;
    let id = listing["id"].as_str().unwrap();
    let original_deadline = listing["expires_at"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/listings/{id}/renew"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let renewed: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(renewed["status"], "active");
    let before = chrono::DateTime::parse_from_rfc3339(&original_deadline).unwrap();
    let after =
        chrono::DateTime::parse_from_rfc3339(renewed["expires_at"].as_str().unwrap()).unwrap();
    assert!(after >= before);
}

#[actix_web::test]
async fn upload_stores_blob_and_returns_public_url() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;

    let req = test::TestRequest::post()
        .uri("/api/uploads?ext=jpg")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_payload(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8080/uploads/"));
    assert!(url.ends_with(".jpg"));

    let req = test::TestRequest::post()
        .uri("/api/uploads?ext=exe")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_payload(vec![1, 2, 3])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/uploads?ext=jpg")
        .set_payload(vec![1, 2, 3])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn update_round_trips_changed_fields() {
    let app = spawn_app(test_state()).await;
    let token = register(&app, "maria").await;
    let listing = create_listing(&app, &token, "Bicicleta aro 29").await;
    let id = listing["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "title": "Bicicleta aro 29 (revisada)", "price": "399.90" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated["title"], "Bicicleta aro 29 (revisada)");
    assert_eq!(updated["price"], "399.90");
    assert_eq!(updated["category"], "esportes");
}
