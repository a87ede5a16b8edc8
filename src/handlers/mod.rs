pub mod common;
pub mod products;

use crate::db::DbPool;
use crate::services::product_service::ProductService;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        let products = Arc::new(ProductService::new(db_pool));

        Self { products }
    }
}
