use crate::{
    db::DbPool,
    entities::product,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    /// When false, inactive products are included in listings
    pub active_only: bool,
    pub search: Option<String>,
}

/// Service for managing the product catalog. Stock is never mutated here;
/// that goes through the manual inventory or order services so every change
/// leaves an audit trail.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new product
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            sku: Set(input.sku.trim().to_string()),
            price: Set(input.price),
            stock: Set(input.stock),
            category_id: Set(input.category_id),
            supplier_id: Set(input.supplier_id),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        // Duplicate SKUs are rejected by the unique index.
        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ProductCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Product created: {} (sku {})", created.id, created.sku);
        Ok(created)
    }

    /// Updates product metadata. Stock changes are rejected here by design.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        let existing = self.get_product(&product_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Product {} not found", product_id))
        })?;

        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "price must not be negative".to_string(),
                ));
            }
        }

        let mut model: product::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        if let Some(sku) = input.sku {
            model.sku = Set(sku.trim().to_string());
        }
        if let Some(price) = input.price {
            model.price = Set(price);
        }
        if let Some(category_id) = input.category_id {
            model.category_id = Set(Some(category_id));
        }
        if let Some(supplier_id) = input.supplier_id {
            model.supplier_id = Set(Some(supplier_id));
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ProductUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Product updated: {}", updated.id);
        Ok(updated)
    }

    /// Deactivates a product, hiding it from default listings.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_product(&product_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Product {} not found", product_id))
        })?;

        let mut model: product::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ProductDeleted(product_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Product deactivated: {}", product_id);
        Ok(())
    }

    /// Gets a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        product_id: &Uuid,
    ) -> Result<Option<product::Model>, ServiceError> {
        product::Entity::find_by_id(*product_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists products with pagination and optional filters.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = product::Entity::find();

        if filter.active_only {
            query = query.filter(product::Column::IsActive.eq(true));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(product::Column::SupplierId.eq(supplier_id));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.like(&pattern))
                    .add(product::Column::Sku.like(&pattern)),
            );
        }

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let products = query
            .order_by_asc(product::Column::Name)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((products, total))
    }
}
