use crate::{
    db::DbPool,
    entities::supplier,
    errors::ServiceError,
    events::{Event, EventSender},
    rut::Rut,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    pub name: String,
    pub rut: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub rut: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub payment_terms: Option<String>,
}

/// Service for managing suppliers. Identity rules mirror clients: canonical
/// RUT plus lowercased email, unique while not soft-deleted.
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new supplier
    #[instrument(skip(self))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let rut = Rut::parse(&input.rut)?.canonical();
        let email = input.email.trim().to_lowercase();

        self.assert_identity_available(&rut, &email, None).await?;

        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            rut: Set(rut),
            email: Set(email),
            phone: Set(input.phone),
            address: Set(input.address),
            contact_name: Set(input.contact_name),
            payment_terms: Set(input.payment_terms),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::SupplierCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Supplier created: {}", created.id);
        Ok(created)
    }

    /// Updates an existing supplier
    #[instrument(skip(self))]
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let existing = self.get_supplier(&supplier_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Supplier {} not found", supplier_id))
        })?;

        let rut = match &input.rut {
            Some(raw) => Rut::parse(raw)?.canonical(),
            None => existing.rut.clone(),
        };
        let email = match &input.email {
            Some(raw) => raw.trim().to_lowercase(),
            None => existing.email.clone(),
        };

        if rut != existing.rut || email != existing.email {
            self.assert_identity_available(&rut, &email, Some(supplier_id))
                .await?;
        }

        let mut model: supplier::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        model.rut = Set(rut);
        model.email = Set(email);
        if let Some(phone) = input.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            model.address = Set(Some(address));
        }
        if let Some(contact_name) = input.contact_name {
            model.contact_name = Set(Some(contact_name));
        }
        if let Some(payment_terms) = input.payment_terms {
            model.payment_terms = Set(Some(payment_terms));
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::SupplierUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Supplier updated: {}", updated.id);
        Ok(updated)
    }

    /// Soft-deletes a supplier
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_supplier(&supplier_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Supplier {} not found", supplier_id))
        })?;

        let mut model: supplier::ActiveModel = existing.into();
        model.deleted_at = Set(Some(Utc::now()));
        model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::SupplierDeleted(supplier_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Supplier deleted: {}", supplier_id);
        Ok(())
    }

    /// Gets a non-deleted supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(
        &self,
        supplier_id: &Uuid,
    ) -> Result<Option<supplier::Model>, ServiceError> {
        supplier::Entity::find_by_id(*supplier_id)
            .filter(supplier::Column::DeletedAt.is_null())
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists non-deleted suppliers with pagination, returning the total count.
    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let query = supplier::Entity::find().filter(supplier::Column::DeletedAt.is_null());

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let suppliers = query
            .order_by_asc(supplier::Column::Name)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((suppliers, total))
    }

    async fn assert_identity_available(
        &self,
        rut: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = supplier::Entity::find()
            .filter(supplier::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(supplier::Column::Rut.eq(rut))
                    .add(supplier::Column::Email.eq(email)),
            );

        if let Some(id) = exclude {
            query = query.filter(supplier::Column::Id.ne(id));
        }

        let duplicates = query
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        if duplicates > 0 {
            return Err(ServiceError::Conflict(format!(
                "a supplier with rut {} or email {} already exists",
                rut, email
            )));
        }

        Ok(())
    }
}
