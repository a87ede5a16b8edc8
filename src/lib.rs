//! Catalog API Library
//!
//! This crate provides the core functionality for the product catalog API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Uniform response envelope: every body-bearing operation echoes the HTTP
/// status code and a human-readable message alongside the payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
    pub status: u16,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: Option<T>, message: String, status: u16) -> Self {
        Self {
            data,
            message,
            success: true,
            status,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiEnvelope<T>>, errors::ServiceError>;

// API routes function
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Catalog API
        .nest("/products", handlers::products::products_routes())
}

async fn api_status() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "catalog-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiEnvelope::success(
        Some(status_data),
        "ok".to_string(),
        StatusCode::OK.as_u16(),
    )))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    // Check database connectivity
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiEnvelope::success(
        Some(health_data),
        "health check".to_string(),
        StatusCode::OK.as_u16(),
    )))
}

#[cfg(test)]
mod envelope_tests {
    use super::*;

    #[test]
    fn success_envelope_echoes_status_into_body() {
        let envelope = ApiEnvelope::success(
            Some(json!({"id": 1})),
            "all products retrieved successfully".to_string(),
            200,
        );

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["status"], json!(200));
        assert_eq!(value["message"], json!("all products retrieved successfully"));
        assert_eq!(value["data"], json!({"id": 1}));
    }

    #[test]
    fn empty_envelope_serializes_data_as_null() {
        let envelope =
            ApiEnvelope::<Value>::success(None, "this product deleted successfully".to_string(), 200);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"], Value::Null);
    }
}
