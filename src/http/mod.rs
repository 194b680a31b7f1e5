//! HTTP transport for the order service.
//!
//! Decodes JSON requests, calls [`OrderService`], and encodes orders or
//! errors back into responses. No business rules live here.

mod error;
mod handlers;

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use crate::domain::order::OrderService;

pub use error::ApiError;

fn bad_request(err: impl std::fmt::Display) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// Register all routes. The app must carry `web::Data<OrderService>`.
///
/// Extractor failures are rendered like every other error, as 400 with
/// `{"error": "<message>"}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err)));

    cfg.route("/orders", web::post().to(handlers::create_order))
        .route("/orders", web::get().to(handlers::get_orders))
        .route("/orders", web::patch().to(handlers::edit_order))
        .route("/orders/status", web::put().to(handlers::update_order_status))
        .route("/orders/{order_id}", web::get().to(handlers::get_order))
        .route("/metrics", web::get().to(handlers::metrics))
        .route("/health", web::get().to(handlers::health));
}

pub async fn start_server(service: Arc<OrderService>, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("Starting order HTTP server on http://{}:{}", host, port);

    let service = web::Data::from(service);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderStatus};
    use crate::metrics::Metrics;
    use crate::repository::InMemoryOrderRepository;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    fn service() -> web::Data<OrderService> {
        let repo = Arc::new(InMemoryOrderRepository::with_products(["p1", "p2"]));
        let metrics = Arc::new(Metrics::new().unwrap());
        web::Data::new(OrderService::new(repo, metrics))
    }

    fn create_body() -> Value {
        json!({
            "user_id": "u1",
            "products": ["p1"],
            "price": 100,
            "delivery_type": "standard",
            "address_id": "addr1"
        })
    }

    #[actix_web::test]
    async fn test_create_and_fetch_order() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/orders").set_json(create_body()).to_request();
        let created: Order = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.order_status, OrderStatus::Created);

        let req = test::TestRequest::get()
            .uri(&format!("/orders/{}", created.id))
            .to_request();
        let fetched: Order = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_create_with_unknown_product_is_not_found() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let mut body = create_body();
        body["products"] = json!(["p404"]);
        let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Product does not exist: p404");
    }

    #[actix_web::test]
    async fn test_status_update_flow() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/orders").set_json(create_body()).to_request();
        let created: Order = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri("/orders/status")
            .set_json(json!({ "order_id": created.id, "order_status": "Paid" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/orders/status")
            .set_json(json!({ "order_id": created.id, "order_status": "Done" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::put()
            .uri("/orders/status")
            .set_json(json!({ "order_id": created.id, "order_status": "Lost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_and_edit() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/orders").set_json(create_body()).to_request();
        let created: Order = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::patch()
            .uri("/orders")
            .set_json(json!({ "order_id": created.id, "products": ["p2"] }))
            .to_request();
        let edited: Order = test::call_and_read_body_json(&app, req).await;
        assert_eq!(edited.product_ids, vec!["p2".to_string()]);
        assert_eq!(edited.address, "addr1");

        let req = test::TestRequest::get().uri("/orders?user_id=u1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/orders?user_id=nobody").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["orders"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_delivery_type_is_json_bad_request() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let mut body = create_body();
        body["delivery_type"] = json!("drone");
        let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("drone"));
    }

    #[actix_web::test]
    async fn test_malformed_order_ids_are_json_bad_requests() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/orders/not-a-uuid").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        let req = test::TestRequest::put()
            .uri("/orders/status")
            .set_json(json!({ "order_id": "42", "order_status": "Paid" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_edit_missing_order_is_not_found() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::patch()
            .uri("/orders")
            .set_json(json!({ "order_id": uuid::Uuid::new_v4(), "address": "addr2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health_and_metrics() {
        let app = test::init_service(App::new().app_data(service()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post().uri("/orders").set_json(create_body()).to_request();
        let _ = test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("orders_created_total 1"));
    }
}
