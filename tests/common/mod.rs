use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use catalog_api::{
    config::AppConfig,
    db,
    entities::{category, product},
    handlers::AppServices,
    AppState,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a
/// file-based SQLite database, one fresh file per test.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    db_file: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // Minimal configuration suitable for tests.
        let db_file = format!("catalog_test_{}.db", Uuid::new_v4().simple());
        let _ = std::fs::remove_file(&db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            services,
        };

        let router = Router::new()
            .nest("/api/v1", catalog_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            db_file,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Deserialize a response body as JSON.
    pub async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        serde_json::from_slice(&bytes).expect("response body was not valid json")
    }

    /// Insert a category row directly, bypassing the HTTP surface.
    pub async fn seed_category(&self, name: &str) -> category::Model {
        let row = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        };

        row.insert(&*self.state.db)
            .await
            .expect("seed category for tests")
    }

    /// Insert a product row directly with an explicit status.
    pub async fn seed_product(
        &self,
        name: &str,
        price: Decimal,
        status: product::ProductStatus,
        category_id: Uuid,
    ) -> product::Model {
        let row = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(format!("{} seeded for integration tests", name))),
            price: Set(price),
            status: Set(status),
            category_id: Set(category_id),
            ..Default::default()
        };

        row.insert(&*self.state.db)
            .await
            .expect("seed product for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}
