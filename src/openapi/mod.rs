use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = r#"
# Product Catalog API

A CRUD and search API for a product catalog where every product belongs to
a category and carries an availability status.

## Features

- **Product Management**: Create, read, update and delete catalog products
- **Status Toggling**: Flip a product between `active` and `unactive`
- **End-user Listing**: Serve only the products that are currently active
- **Name Search**: Substring search partitioned into active results and
  names of matching products that are not active

## Error Handling

Failures use a uniform error envelope with the status code echoed into the
body:

```json
{
  "data": null,
  "message": "sorry this product not found to show",
  "success": false,
  "status": 404
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::toggle_product_status,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::list_active_products,
        crate::handlers::products::search_products,
    ),
    components(
        schemas(
            // Common types
            crate::ApiEnvelope<serde_json::Value>,

            // Product types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,
            crate::handlers::products::ProductResponse,
            crate::handlers::products::ActiveProductResponse,
            crate::handlers::products::CategorySummary,
            crate::handlers::products::ProductSummary,
            crate::handlers::products::StatusChangeResponse,
            crate::handlers::products::UpdateSnapshots,
            crate::handlers::products::ProductUpdateEnvelope,
            crate::handlers::products::SearchMeta,
            crate::handlers::products::ProductSearchEnvelope,
            crate::entities::product::ProductStatus,

            // Error types
            crate::errors::ErrorBody
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_product_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Catalog API"));
        assert!(json.contains("/api/v1/products"));
    }
}
