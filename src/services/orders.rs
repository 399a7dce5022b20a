use crate::{
    db::DbPool,
    entities::{
        client, order,
        order::OrderStatus,
        order_item, product,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::load_product_for_update,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub client_id: Uuid,
    /// User registering the order
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOrderInput {
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub client_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

/// Service for managing orders. Creating an order decrements stock for each
/// line inside the order transaction; stock may go negative (backorder).
/// Cancelling restores it.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an order with its items, capturing unit prices and adjusting
    /// stock atomically.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<(order::Model, Vec<order_item::Model>), ServiceError> {
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "an order requires at least one item".to_string(),
            ));
        }
        if input.items.iter().any(|item| item.quantity <= 0) {
            return Err(ServiceError::ValidationError(
                "item quantities must be positive integers".to_string(),
            ));
        }

        let created = self
            .db_pool
            .transaction::<_, (order::Model, Vec<order_item::Model>), ServiceError>(move |txn| {
                Box::pin(async move {
                    let client_exists = client::Entity::find_by_id(input.client_id)
                        .filter(client::Column::DeletedAt.is_null())
                        .one(txn)
                        .await
                        .map_err(ServiceError::from_db)?
                        .is_some();
                    if !client_exists {
                        return Err(ServiceError::NotFound(format!(
                            "Client {} not found",
                            input.client_id
                        )));
                    }

                    let order_id = Uuid::new_v4();
                    let mut total = Decimal::ZERO;
                    let mut item_models = Vec::with_capacity(input.items.len());

                    for item in &input.items {
                        let existing = load_product_for_update(txn, item.product_id).await?;
                        if !existing.is_active {
                            return Err(ServiceError::InvalidInput(format!(
                                "Product {} is inactive",
                                item.product_id
                            )));
                        }

                        let unit_price = existing.price;
                        let new_stock = existing.stock - item.quantity;

                        let mut active_product: product::ActiveModel = existing.into();
                        active_product.stock = Set(new_stock);
                        active_product.updated_at = Set(Some(Utc::now()));
                        active_product
                            .update(txn)
                            .await
                            .map_err(ServiceError::from_db)?;

                        total += unit_price * Decimal::from(item.quantity);

                        item_models.push(order_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            order_id: Set(order_id),
                            product_id: Set(item.product_id),
                            quantity: Set(item.quantity),
                            unit_price: Set(unit_price),
                        });
                    }

                    let order_model = order::ActiveModel {
                        id: Set(order_id),
                        client_id: Set(input.client_id),
                        user_id: Set(input.user_id),
                        status: Set(OrderStatus::Pending.as_str().to_string()),
                        total: Set(total),
                        notes: Set(input.notes.clone()),
                        created_at: Set(Utc::now()),
                        updated_at: Set(None),
                    };
                    let order = order_model.insert(txn).await.map_err(ServiceError::from_db)?;

                    let mut items = Vec::with_capacity(item_models.len());
                    for item_model in item_models {
                        items.push(item_model.insert(txn).await.map_err(ServiceError::from_db)?);
                    }

                    Ok((order, items))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::from_db(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::OrderCreated(created.0.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Order created: {} (total {})", created.0.id, created.0.total);
        Ok(created)
    }

    /// Cancels a pending order and restores the stock of every item.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        let cancelled = self
            .db_pool
            .transaction::<_, order::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = order::Entity::find_by_id(order_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::from_db)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Order {} not found", order_id))
                        })?;

                    if existing.status != OrderStatus::Pending.as_str() {
                        return Err(ServiceError::InvalidInput(format!(
                            "only pending orders can be cancelled (status is '{}')",
                            existing.status
                        )));
                    }

                    let items = existing
                        .find_related(order_item::Entity)
                        .all(txn)
                        .await
                        .map_err(ServiceError::from_db)?;

                    for item in items {
                        let product_row = load_product_for_update(txn, item.product_id).await?;
                        let restored = product_row.stock + item.quantity;
                        let mut active_product: product::ActiveModel = product_row.into();
                        active_product.stock = Set(restored);
                        active_product.updated_at = Set(Some(Utc::now()));
                        active_product
                            .update(txn)
                            .await
                            .map_err(ServiceError::from_db)?;
                    }

                    let mut model: order::ActiveModel = existing.into();
                    model.status = Set(OrderStatus::Cancelled.as_str().to_string());
                    model.updated_at = Set(Some(Utc::now()));
                    model.update(txn).await.map_err(ServiceError::from_db)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::from_db(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::OrderCancelled(order_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Order cancelled: {}", order_id);
        Ok(cancelled)
    }

    /// Updates order notes and/or status. Cancellation must go through
    /// [`Self::cancel_order`] so stock is restored.
    #[instrument(skip(self))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        input: UpdateOrderInput,
    ) -> Result<order::Model, ServiceError> {
        let existing = order::Entity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        if let Some(status) = input.status {
            if status == OrderStatus::Cancelled {
                return Err(ServiceError::InvalidInput(
                    "use the cancel operation to cancel an order".to_string(),
                ));
            }
            if existing.status == OrderStatus::Cancelled.as_str() {
                return Err(ServiceError::InvalidInput(
                    "a cancelled order cannot change status".to_string(),
                ));
            }
        }

        let mut model: order::ActiveModel = existing.into();
        if let Some(status) = input.status {
            model.status = Set(status.as_str().to_string());
        }
        if let Some(notes) = input.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::OrderUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Order updated: {}", updated.id);
        Ok(updated)
    }

    /// Removes a cancelled order and its items. Active orders must be
    /// cancelled first so stock accounting stays consistent.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let existing = order::Entity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        if existing.status != OrderStatus::Cancelled.as_str() {
            return Err(ServiceError::InvalidInput(
                "only cancelled orders can be deleted".to_string(),
            ));
        }

        existing
            .delete(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        self.event_sender
            .send(Event::OrderDeleted(order_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!("Order deleted: {}", order_id);
        Ok(())
    }

    /// Gets an order with its items
    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        order_id: &Uuid,
    ) -> Result<Option<(order::Model, Vec<order_item::Model>)>, ServiceError> {
        let found = order::Entity::find_by_id(*order_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        match found {
            Some(order) => {
                let items = order
                    .find_related(order_item::Entity)
                    .all(&*self.db_pool)
                    .await
                    .map_err(ServiceError::from_db)?;
                Ok(Some((order, items)))
            }
            None => Ok(None),
        }
    }

    /// Lists orders, newest first, with optional filters.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let mut query = order::Entity::find();

        if let Some(client_id) = filter.client_id {
            query = query.filter(order::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let orders = query
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((orders, total))
    }
}
