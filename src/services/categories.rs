use crate::{
    db::DbPool,
    entities::category,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Service for managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new category; names are unique among non-deleted rows.
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let name = input.name.trim().to_string();
        self.assert_name_available(&name, None).await?;

        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(input.description),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::CategoryCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Category created: {}", created.id);
        Ok(created)
    }

    /// Updates an existing category
    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let existing = self.get_category(&category_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Category {} not found", category_id))
        })?;

        if let Some(name) = &input.name {
            let name = name.trim();
            if name != existing.name {
                self.assert_name_available(name, Some(category_id)).await?;
            }
        }

        let mut model: category::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::CategoryUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Category updated: {}", updated.id);
        Ok(updated)
    }

    /// Soft-deletes a category
    #[instrument(skip(self))]
    pub async fn delete_category(&self, category_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_category(&category_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Category {} not found", category_id))
        })?;

        let mut model: category::ActiveModel = existing.into();
        model.deleted_at = Set(Some(Utc::now()));
        model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::CategoryDeleted(category_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Category deleted: {}", category_id);
        Ok(())
    }

    /// Gets a non-deleted category by ID
    #[instrument(skip(self))]
    pub async fn get_category(
        &self,
        category_id: &Uuid,
    ) -> Result<Option<category::Model>, ServiceError> {
        category::Entity::find_by_id(*category_id)
            .filter(category::Column::DeletedAt.is_null())
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists non-deleted categories with pagination.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let query = category::Entity::find().filter(category::Column::DeletedAt.is_null());

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let categories = query
            .order_by_asc(category::Column::Name)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((categories, total))
    }

    async fn assert_name_available(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = category::Entity::find()
            .filter(category::Column::DeletedAt.is_null())
            .filter(category::Column::Name.eq(name));

        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }

        let duplicates = query
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        if duplicates > 0 {
            return Err(ServiceError::Conflict(format!(
                "a category named '{}' already exists",
                name
            )));
        }

        Ok(())
    }
}
