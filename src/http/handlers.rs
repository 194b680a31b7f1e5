use actix_web::{web, HttpResponse, Responder};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ApiError;
use crate::domain::order::{CreateOrder, EditOrder, OrderFilter, OrderService, OrderStatus};

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    pub order_status: String,
}

pub async fn create_order(
    service: web::Data<OrderService>,
    request: web::Json<CreateOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = service.create_order(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn update_order_status(
    service: web::Data<OrderService>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let status: OrderStatus = request.order_status.parse()?;

    service.transition_status(request.order_id, status).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Order status updated successfully",
    })))
}

pub async fn get_orders(
    service: web::Data<OrderService>,
    filter: web::Query<OrderFilter>,
) -> Result<HttpResponse, ApiError> {
    let orders = service.get_orders(filter.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "orders": orders })))
}

pub async fn get_order(
    service: web::Data<OrderService>,
    order_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order = service.get_order(order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn edit_order(
    service: web::Data<OrderService>,
    request: web::Json<EditOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = service.edit_order(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn metrics(service: web::Data<OrderService>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = service.metrics().registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-lifecycle"
    }))
}
