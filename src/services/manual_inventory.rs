use crate::{
    db::DbPool,
    entities::{
        manual_inventory::{self, AdjustmentType},
        product,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::load_product_for_update,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AdjustStockInput {
    pub product_id: Uuid,
    /// User performing the adjustment
    pub user_id: Uuid,
    pub adjustment_type: AdjustmentType,
    pub quantity: i32,
    pub reason: Option<String>,
}

/// Outcome of a stock adjustment, combining the audit row with the stock
/// level it produced.
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub record: manual_inventory::Model,
    pub new_stock: i32,
}

/// Service for manual inventory adjustments. Every mutation locks the
/// product row, updates its stock and appends an audit record inside a single
/// transaction; either both writes commit or neither does.
pub struct ManualInventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ManualInventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Applies a manual stock adjustment.
    ///
    /// A decrease may drive stock negative: that is a backorder, not an
    /// error. Fails with ValidationError before touching the database when
    /// quantity is not positive or a decrease carries no reason.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        input: AdjustStockInput,
    ) -> Result<StockAdjustment, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be a positive integer".to_string(),
            ));
        }
        if input.adjustment_type == AdjustmentType::Decrease
            && input
                .reason
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(ServiceError::ValidationError(
                "a reason is required when decreasing stock".to_string(),
            ));
        }

        let product_id = input.product_id;
        let adjustment = self
            .db_pool
            .transaction::<_, StockAdjustment, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = load_product_for_update(txn, input.product_id).await?;

                    let previous_stock = existing.stock;
                    let new_stock = match input.adjustment_type {
                        AdjustmentType::Increase => previous_stock + input.quantity,
                        AdjustmentType::Decrease => previous_stock - input.quantity,
                    };

                    let mut active_product: product::ActiveModel = existing.into();
                    active_product.stock = Set(new_stock);
                    active_product.updated_at = Set(Some(Utc::now()));
                    active_product
                        .update(txn)
                        .await
                        .map_err(ServiceError::from_db)?;

                    let record = manual_inventory::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_id: Set(input.product_id),
                        user_id: Set(input.user_id),
                        adjustment_type: Set(input.adjustment_type.as_str().to_string()),
                        quantity: Set(input.quantity),
                        reason: Set(input.reason.clone()),
                        previous_stock: Set(previous_stock),
                        new_stock: Set(new_stock),
                        created_at: Set(Utc::now()),
                    };

                    let record = record.insert(txn).await.map_err(ServiceError::from_db)?;

                    Ok(StockAdjustment { record, new_stock })
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::from_db(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::StockAdjusted {
                product_id,
                adjustment_id: adjustment.record.id,
                previous_stock: adjustment.record.previous_stock,
                new_stock: adjustment.new_stock,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(
            "Stock adjusted for product {}: {} {} ({} -> {})",
            product_id,
            adjustment.record.adjustment_type,
            adjustment.record.quantity,
            adjustment.record.previous_stock,
            adjustment.new_stock
        );

        Ok(adjustment)
    }

    /// Gets a single adjustment record
    #[instrument(skip(self))]
    pub async fn get_adjustment(
        &self,
        adjustment_id: &Uuid,
    ) -> Result<Option<manual_inventory::Model>, ServiceError> {
        manual_inventory::Entity::find_by_id(*adjustment_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Lists adjustment records, newest first, optionally filtered by product.
    #[instrument(skip(self))]
    pub async fn list_adjustments(
        &self,
        product_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<manual_inventory::Model>, u64), ServiceError> {
        let mut query = manual_inventory::Entity::find();
        if let Some(pid) = product_id {
            query = query.filter(manual_inventory::Column::ProductId.eq(pid));
        }

        let total = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let records = query
            .order_by_desc(manual_inventory::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        Ok((records, total))
    }
}
