use crate::{
    auth::{hash_password, rbac},
    db::DbPool,
    entities::user,
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
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Service for managing application users. Password hashing happens here,
/// explicitly, on every write that carries a password; entities have no
/// hashing hooks.
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new user with a hashed password.
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        if !rbac::is_known_role(&input.role) {
            return Err(ServiceError::ValidationError(format!(
                "unknown role '{}'",
                input.role
            )));
        }
        if input.password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let email = input.email.trim().to_lowercase();
        self.assert_email_available(&email, None).await?;

        let password_hash =
            hash_password(&input.password).map_err(|e| ServiceError::HashError(e.to_string()))?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(input.role),
            active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::UserCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("User created: {} ({})", created.id, created.role);
        Ok(created)
    }

    /// Updates a user; a provided password is re-hashed.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<user::Model, ServiceError> {
        let existing = self.get_user(&user_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("User {} not found", user_id))
        })?;

        if let Some(role) = &input.role {
            if !rbac::is_known_role(role) {
                return Err(ServiceError::ValidationError(format!(
                    "unknown role '{}'",
                    role
                )));
            }
        }

        let email = match &input.email {
            Some(raw) => {
                let email = raw.trim().to_lowercase();
                if email != existing.email {
                    self.assert_email_available(&email, Some(user_id)).await?;
                }
                Some(email)
            }
            None => None,
        };

        let mut model: user::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(email) = email {
            model.email = Set(email);
        }
        if let Some(password) = input.password {
            if password.len() < 8 {
                return Err(ServiceError::ValidationError(
                    "password must be at least 8 characters".to_string(),
                ));
            }
            let password_hash =
                hash_password(&password).map_err(|e| ServiceError::HashError(e.to_string()))?;
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = input.role {
            model.role = Set(role);
        }
        if let Some(active) = input.active {
            model.active = Set(active);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::UserUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("User updated: {}", updated.id);
        Ok(updated)
    }

    /// Deactivates a user. Their tokens stop working at the next refresh.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_user(&user_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("User {} not found", user_id))
        })?;

        let mut model: user::ActiveModel = existing.into();
        model.active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::UserDeactivated(user_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("User deactivated: {}", user_id);
        Ok(())
    }

    /// Gets a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &Uuid) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find_by_id(*user_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists users with pagination.
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let query = user::Entity::find();

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let users = query
            .order_by_asc(user::Column::Name)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((users, total))
    }

    async fn assert_email_available(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(user::Column::Id.ne(id));
        }

        let duplicates = query
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        if duplicates > 0 {
            return Err(ServiceError::Conflict(format!(
                "a user with email {} already exists",
                email
            )));
        }

        Ok(())
    }
}
