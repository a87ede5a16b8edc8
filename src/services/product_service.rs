use crate::{
    db::DbPool,
    entities::{
        category,
        product::{self, ProductStatus},
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Typed input for product creation. Field validation happens at the HTTP
/// layer; the service enforces referential invariants.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Uuid,
}

/// Typed input for product updates. `None` means "keep the current value";
/// a present value is always applied, so an explicit price of zero is
/// distinguishable from an omitted price.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
}

/// A product together with its (optionally resolved) category row.
#[derive(Debug, Clone)]
pub struct JoinedProduct {
    pub product: product::Model,
    pub category: Option<category::Model>,
}

impl JoinedProduct {
    /// Derived category name annotation, empty when the link is dangling.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Outcome of a status toggle.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub old_status: ProductStatus,
    pub new_status: ProductStatus,
    pub product: JoinedProduct,
}

/// Pre- and post-update snapshots, both joined with category.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub old: JoinedProduct,
    pub new: JoinedProduct,
}

/// Result of a name search, partitioned by availability.
#[derive(Debug, Clone)]
pub struct NameSearchResults {
    pub active: Vec<product::Model>,
    pub unactive_names: Vec<String>,
}

/// Service for managing catalog products
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Fetch one product joined with its category.
    async fn find_joined(&self, id: Uuid) -> Result<Option<JoinedProduct>, ServiceError> {
        let db = &*self.db_pool;

        let row = product::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(db)
            .await?;

        Ok(row.map(|(product, category)| JoinedProduct { product, category }))
    }

    /// List all products, each annotated with its category.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<JoinedProduct>, ServiceError> {
        let db = &*self.db_pool;

        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(product::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, category)| JoinedProduct { product, category })
            .collect())
    }

    /// Get a single product by id, joined with its category.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<JoinedProduct, ServiceError> {
        self.find_joined(id).await?.ok_or_else(|| {
            ServiceError::NotFound("sorry this product not found to show".to_string())
        })
    }

    /// Create a new product after resolving its category, then re-fetch it
    /// joined with the category. The insert and the re-fetch are two separate
    /// round trips, not a transaction.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<JoinedProduct, ServiceError> {
        let db = &*self.db_pool;
        let CreateProductInput {
            name,
            description,
            price,
            category_id,
        } = input;

        let category = category::Entity::find_by_id(category_id).one(db).await?;
        if category.is_none() {
            return Err(ServiceError::NotFound(
                "category not found to select".to_string(),
            ));
        }

        // Status is left unset so the store default applies.
        let product_id = Uuid::new_v4();
        let row = product::ActiveModel {
            id: Set(product_id),
            name: Set(name.clone()),
            description: Set(description),
            price: Set(price),
            category_id: Set(category_id),
            ..Default::default()
        };

        row.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(format!(
                    "Cannot store {} this product already exist",
                    name
                ))
            } else {
                error!(name = %name, error = %e, "Failed to insert product");
                ServiceError::DatabaseError(e)
            }
        })?;

        let stored = self.find_joined(product_id).await?.ok_or_else(|| {
            ServiceError::InternalError("created product missing on re-fetch".to_string())
        })?;

        info!(product_id = %product_id, name = %stored.product.name, "Product created successfully");

        Ok(stored)
    }

    /// Flip a product between `active` and `unactive`, persist the flip and
    /// re-fetch the row joined with its category.
    #[instrument(skip(self))]
    pub async fn toggle_status(&self, id: Uuid) -> Result<StatusChange, ServiceError> {
        let db = &*self.db_pool;

        let product = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("this product not found".to_string()))?;

        let old_status = product.status;
        let new_status = old_status.toggled();

        let mut active: product::ActiveModel = product.into();
        active.status = Set(new_status);
        active.update(db).await?;

        let refreshed = self.find_joined(id).await?.ok_or_else(|| {
            ServiceError::InternalError("toggled product missing on re-fetch".to_string())
        })?;

        info!(product_id = %id, from = %old_status, to = %new_status, "Product status toggled");

        Ok(StatusChange {
            old_status,
            new_status,
            product: refreshed,
        })
    }

    /// Update a product with field-presence semantics: only fields carried in
    /// the input are written, everything else keeps its current value.
    /// Returns both the pre-update and post-update snapshots.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<UpdateOutcome, ServiceError> {
        let db = &*self.db_pool;

        let old = self.find_joined(id).await?.ok_or_else(|| {
            ServiceError::NotFound("this product not found to update".to_string())
        })?;

        if let Some(category_id) = input.category_id {
            let exists = category::Entity::find_by_id(category_id).one(db).await?;
            if exists.is_none() {
                return Err(ServiceError::ValidationError(
                    "category_id does not reference an existing category".to_string(),
                ));
            }
        }

        let mut active: product::ActiveModel = old.product.clone().into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }

        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }

        if let Some(price) = input.price {
            active.price = Set(price);
        }

        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }

        active.update(db).await?;

        let new = self.find_joined(id).await?.ok_or_else(|| {
            ServiceError::InternalError("updated product missing on re-fetch".to_string())
        })?;

        info!(product_id = %id, "Product updated successfully");

        Ok(UpdateOutcome { old, new })
    }

    /// Hard-delete a product. Deleting a missing id is an error, not a no-op.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let product = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("this product not found to delete".to_string())
            })?;

        product.delete(db).await?;

        info!(product_id = %id, "Product deleted successfully");

        Ok(())
    }

    /// List only active products, joined with their categories.
    #[instrument(skip(self))]
    pub async fn list_active_products(&self) -> Result<Vec<JoinedProduct>, ServiceError> {
        let db = &*self.db_pool;

        let rows = product::Entity::find()
            .filter(product::Column::Status.eq(ProductStatus::Active))
            .find_also_related(category::Entity)
            .order_by_asc(product::Column::CreatedAt)
            .all(db)
            .await?;

        if rows.is_empty() {
            return Err(ServiceError::NotFound(
                "no active products found".to_string(),
            ));
        }

        Ok(rows
            .into_iter()
            .map(|(product, category)| JoinedProduct { product, category })
            .collect())
    }

    /// Substring search on product name, partitioned into active rows and the
    /// names of non-active matches.
    #[instrument(skip(self))]
    pub async fn search_products_by_name(
        &self,
        name: &str,
    ) -> Result<NameSearchResults, ServiceError> {
        let db = &*self.db_pool;

        let matches = product::Entity::find()
            .filter(product::Column::Name.contains(name))
            .order_by_asc(product::Column::CreatedAt)
            .all(db)
            .await?;

        if matches.is_empty() {
            return Err(ServiceError::NotFound(
                "no products found matching the search criteria".to_string(),
            ));
        }

        let (active, unactive): (Vec<_>, Vec<_>) = matches
            .into_iter()
            .partition(|p| p.status == ProductStatus::Active);

        if active.is_empty() {
            return Err(ServiceError::NotFound(
                "no active products found matching the search criteria".to_string(),
            ));
        }

        Ok(NameSearchResults {
            active,
            unactive_names: unactive.into_iter().map(|p| p.name).collect(),
        })
    }
}
