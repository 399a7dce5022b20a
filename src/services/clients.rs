use crate::{
    db::DbPool,
    entities::client,
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
pub struct CreateClientInput {
    pub name: String,
    pub rut: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub rut: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing clients
#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new client. The RUT is normalized and checksum-validated;
    /// rut/email must be unique among non-deleted clients.
    #[instrument(skip(self))]
    pub async fn create_client(
        &self,
        input: CreateClientInput,
    ) -> Result<client::Model, ServiceError> {
        let rut = Rut::parse(&input.rut)?.canonical();
        let email = input.email.trim().to_lowercase();

        self.assert_identity_available(&rut, &email, None).await?;

        let model = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            rut: Set(rut),
            email: Set(email),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        // The partial unique index is the real guard against races; its
        // violation surfaces as Conflict just like the pre-check above.
        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ClientCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Client created: {}", created.id);
        Ok(created)
    }

    /// Updates an existing client.
    #[instrument(skip(self))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: UpdateClientInput,
    ) -> Result<client::Model, ServiceError> {
        let existing = self.get_client(&client_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Client {} not found", client_id))
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
            self.assert_identity_available(&rut, &email, Some(client_id))
                .await?;
        }

        let mut model: client::ActiveModel = existing.into();
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
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ClientUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Client updated: {}", updated.id);
        Ok(updated)
    }

    /// Soft-deletes a client, freeing its rut/email for reuse.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_client(&client_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Client {} not found", client_id))
        })?;

        let mut model: client::ActiveModel = existing.into();
        model.deleted_at = Set(Some(Utc::now()));
        model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::ClientDeleted(client_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Client deleted: {}", client_id);
        Ok(())
    }

    /// Gets a non-deleted client by ID
    #[instrument(skip(self))]
    pub async fn get_client(
        &self,
        client_id: &Uuid,
    ) -> Result<Option<client::Model>, ServiceError> {
        client::Entity::find_by_id(*client_id)
            .filter(client::Column::DeletedAt.is_null())
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists non-deleted clients with pagination, returning the total count.
    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        let query = client::Entity::find().filter(client::Column::DeletedAt.is_null());

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let clients = query
            .order_by_asc(client::Column::Name)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((clients, total))
    }

    /// Searches non-deleted clients by name, rut or email.
    #[instrument(skip(self))]
    pub async fn search_clients(
        &self,
        search_term: &str,
    ) -> Result<Vec<client::Model>, ServiceError> {
        let pattern = format!("%{}%", search_term);

        client::Entity::find()
            .filter(client::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(client::Column::Name.like(&pattern))
                    .add(client::Column::Rut.like(&pattern))
                    .add(client::Column::Email.like(&pattern)),
            )
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Fast-path duplicate check: rejects a rut/email already held by another
    /// non-deleted client.
    async fn assert_identity_available(
        &self,
        rut: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = client::Entity::find()
            .filter(client::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(client::Column::Rut.eq(rut))
                    .add(client::Column::Email.eq(email)),
            );

        if let Some(id) = exclude {
            query = query.filter(client::Column::Id.ne(id));
        }

        let duplicates = query
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        if duplicates > 0 {
            return Err(ServiceError::Conflict(format!(
                "a client with rut {} or email {} already exists",
                rut, email
            )));
        }

        Ok(())
    }
}
