use crate::entities::product::{self, ProductStatus};
use crate::handlers::common::{map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    services::product_service::{CreateProductInput, JoinedProduct, UpdateProductInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/active", get(list_active_products))
        .route("/search", get(search_products))
        .route(
            "/:id",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/:id/status", patch(toggle_product_status))
}

/// List all products with their category names
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "Products retrieved", body = crate::ApiEnvelope<Vec<ProductResponse>>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_products()
        .await
        .map_err(map_service_error)?;

    let products: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

    Ok(success_response(
        StatusCode::OK,
        Some(products),
        "all products retrieved successfully",
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product retrieved", body = crate::ApiEnvelope<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    let message = format!("this product is {}", product.product.name);

    Ok(success_response(
        StatusCode::OK,
        Some(ProductResponse::from(product)),
        message,
    ))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::ApiEnvelope<ProductResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorBody),
        (status = 404, description = "Category not found", body = crate::errors::ErrorBody),
        (status = 409, description = "Product name already taken", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = CreateProductInput {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category_id: payload.category_id,
    };

    let product = state
        .services
        .products
        .create_product(input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        StatusCode::CREATED,
        Some(ProductResponse::from(product)),
        "product stored successfully",
    ))
}

/// Toggle a product between active and unactive
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Status toggled", body = crate::ApiEnvelope<StatusChangeResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn toggle_product_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let change = state
        .services
        .products
        .toggle_status(id)
        .await
        .map_err(map_service_error)?;

    let message = format!(
        "status is changed successfully from {} to {}",
        change.old_status, change.new_status
    );

    Ok(success_response(
        StatusCode::OK,
        Some(StatusChangeResponse::from(change.product)),
        message,
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductUpdateEnvelope),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorBody),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = UpdateProductInput {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category_id: payload.category_id,
    };

    let outcome = state
        .services
        .products
        .update_product(id, input)
        .await
        .map_err(map_service_error)?;

    let envelope = ProductUpdateEnvelope {
        message: "product updated successfully".to_string(),
        success: true,
        data: UpdateSnapshots {
            old_data: ProductResponse::from(outcome.old),
            new_data: ProductResponse::from(outcome.new),
        },
        status: StatusCode::OK.as_u16(),
    };

    Ok((StatusCode::OK, axum::Json(envelope)).into_response())
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = crate::ApiEnvelope<serde_json::Value>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .products
        .delete_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        StatusCode::OK,
        None::<serde_json::Value>,
        "this product deleted successfully",
    ))
}

/// List active products only (end-user view)
#[utoipa::path(
    get,
    path = "/api/v1/products/active",
    responses(
        (status = 200, description = "Active products retrieved", body = crate::ApiEnvelope<Vec<ActiveProductResponse>>),
        (status = 404, description = "No active products", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_active_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_active_products()
        .await
        .map_err(map_service_error)?;

    let products: Vec<ActiveProductResponse> = products
        .into_iter()
        .map(ActiveProductResponse::from)
        .collect();

    Ok(success_response(
        StatusCode::OK,
        Some(products),
        "active products retrieved successfully",
    ))
}

/// Search products by name substring
#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(SearchByNameParams),
    responses(
        (status = 200, description = "Search results", body = ProductSearchEnvelope),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorBody),
        (status = 404, description = "No matching products", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchByNameParams>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&params)?;

    let results = state
        .services
        .products
        .search_products_by_name(&params.name)
        .await
        .map_err(map_service_error)?;

    let meta = if results.unactive_names.is_empty() {
        None
    } else {
        Some(SearchMeta {
            message: "if exist unactive products matching your search".to_string(),
            unactive_products: results.unactive_names,
        })
    };

    let envelope = ProductSearchEnvelope {
        message: "result of search about products".to_string(),
        data: results
            .active
            .into_iter()
            .map(ProductSummary::from)
            .collect(),
        meta,
    };

    Ok((StatusCode::OK, axum::Json(envelope)).into_response())
}

// Request/Response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Wireless Bluetooth Headphones",
    "description": "Premium over-ear wireless headphones with active noise cancellation.",
    "price": "149.99",
    "category_id": "550e8400-e29b-41d4-a716-446655440000"
}))]
pub struct CreateProductRequest {
    /// Product display name (unique)
    #[validate(length(min = 1))]
    #[schema(example = "Wireless Bluetooth Headphones")]
    pub name: String,
    /// Product description
    #[serde(default)]
    #[schema(example = "Premium over-ear wireless headphones.")]
    pub description: Option<String>,
    /// Sale price
    #[schema(example = "149.99")]
    pub price: Decimal,
    /// Owning category, must exist
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub category_id: Uuid,
}

/// Update payload. Omitted fields keep the product's current values; a field
/// that is present is always applied, even when it carries a zero or empty
/// value that would read as "falsy".
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 5))]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchByNameParams {
    /// Name substring to match, at least 3 characters
    #[validate(length(min = 3))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "660e8400-e29b-41d4-a716-446655440001",
    "name": "Wireless Bluetooth Headphones",
    "description": "Premium over-ear wireless headphones.",
    "price": "149.99",
    "status": "unactive",
    "category_id": "550e8400-e29b-41d4-a716-446655440000",
    "category_name": "Audio"
}))]
pub struct ProductResponse {
    /// Product UUID
    pub id: Uuid,
    /// Product display name
    pub name: String,
    /// Product description
    pub description: Option<String>,
    /// Sale price
    pub price: Decimal,
    /// Availability status
    pub status: ProductStatus,
    /// Owning category
    pub category_id: Uuid,
    /// Derived from the joined category, not stored on the product
    pub category_name: Option<String>,
}

impl From<JoinedProduct> for ProductResponse {
    fn from(joined: JoinedProduct) -> Self {
        let category_name = joined.category.map(|c| c.name);
        let product = joined.product;

        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            status: product.status,
            category_id: product.category_id,
            category_name,
        }
    }
}

/// Category subset exposed on the end-user listing
#[derive(Debug, Serialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Uuid,
    pub category: Option<CategorySummary>,
}

impl From<JoinedProduct> for ActiveProductResponse {
    fn from(joined: JoinedProduct) -> Self {
        let category = joined.category.map(|c| CategorySummary {
            id: c.id,
            name: c.name,
        });
        let product = joined.product;

        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            category,
        }
    }
}

/// Product fields carried in search results (no category join)
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub status: ProductStatus,
    pub category_id: Uuid,
}

impl From<product::Model> for ProductSummary {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            status: model.status,
            category_id: model.category_id,
        }
    }
}

/// Flat payload returned by the status toggle
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusChangeResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_status: ProductStatus,
    pub category_id: Uuid,
    pub category_name: Option<String>,
}

impl From<JoinedProduct> for StatusChangeResponse {
    fn from(joined: JoinedProduct) -> Self {
        let category_name = joined.category.map(|c| c.name);
        let product = joined.product;

        Self {
            product_id: product.id,
            product_name: product.name,
            product_description: product.description,
            product_price: product.price,
            product_status: product.status,
            category_id: product.category_id,
            category_name,
        }
    }
}

/// Update responses carry both snapshots instead of the uniform envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateSnapshots {
    #[serde(rename = "oldData")]
    pub old_data: ProductResponse,
    #[serde(rename = "newData")]
    pub new_data: ProductResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductUpdateEnvelope {
    pub message: String,
    pub success: bool,
    pub data: UpdateSnapshots,
    pub status: u16,
}

/// Search responses carry active matches plus an explicit-null meta block.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchMeta {
    pub message: String,
    pub unactive_products: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSearchEnvelope {
    pub message: String,
    pub data: Vec<ProductSummary>,
    /// Null when every match is active
    pub meta: Option<SearchMeta>,
}
