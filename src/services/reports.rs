use crate::{
    db::DbPool,
    entities::{
        manual_inventory::{self, AdjustmentType},
        order,
        order::OrderStatus,
        product,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Inventory report data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryReport {
    pub total_products: u64,
    pub out_of_stock_products: u64,
    /// Products with negative stock (backorders)
    pub backordered_products: u64,
    /// Sum of price * stock over active products with positive stock
    pub inventory_value: Decimal,
    pub low_stock: Vec<LowStockProduct>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LowStockProduct {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i32,
}

/// Stock movement report data
#[derive(Debug, Serialize, Deserialize)]
pub struct MovementsReport {
    pub total_movements: u64,
    pub units_increased: i64,
    pub units_decreased: i64,
    pub movements: Vec<manual_inventory::Model>,
}

/// Sales summary report data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesReport {
    pub total_orders: u64,
    /// Revenue over non-cancelled orders
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub orders_by_status: HashMap<String, u64>,
}

/// Service for generating read-only reports
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Inventory snapshot over active products.
    #[instrument(skip(self))]
    pub async fn inventory_report(
        &self,
        low_stock_threshold: i32,
    ) -> Result<InventoryReport, ServiceError> {
        let products = product::Entity::find()
            .filter(product::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let total_products = products.len() as u64;
        let mut out_of_stock = 0u64;
        let mut backordered = 0u64;
        let mut inventory_value = Decimal::ZERO;
        let mut low_stock = Vec::new();

        for p in &products {
            if p.stock == 0 {
                out_of_stock += 1;
            }
            if p.stock < 0 {
                backordered += 1;
            }
            if p.stock > 0 {
                inventory_value += p.price * Decimal::from(p.stock);
            }
            if p.stock <= low_stock_threshold {
                low_stock.push(LowStockProduct {
                    product_id: p.id,
                    name: p.name.clone(),
                    sku: p.sku.clone(),
                    stock: p.stock,
                });
            }
        }

        low_stock.sort_by_key(|p| p.stock);

        Ok(InventoryReport {
            total_products,
            out_of_stock_products: out_of_stock,
            backordered_products: backordered,
            inventory_value,
            low_stock,
        })
    }

    /// Manual stock movements over an optional product/date window.
    #[instrument(skip(self))]
    pub async fn movements_report(
        &self,
        product_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<MovementsReport, ServiceError> {
        let mut query = manual_inventory::Entity::find();

        if let Some(pid) = product_id {
            query = query.filter(manual_inventory::Column::ProductId.eq(pid));
        }
        if let Some(from) = from {
            query = query.filter(manual_inventory::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(manual_inventory::Column::CreatedAt.lte(to));
        }

        let movements = query
            .order_by_desc(manual_inventory::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let mut units_increased = 0i64;
        let mut units_decreased = 0i64;
        for m in &movements {
            match m.adjustment_type.parse::<AdjustmentType>() {
                Ok(AdjustmentType::Increase) => units_increased += i64::from(m.quantity),
                Ok(AdjustmentType::Decrease) => units_decreased += i64::from(m.quantity),
                Err(_) => {}
            }
        }

        Ok(MovementsReport {
            total_movements: movements.len() as u64,
            units_increased,
            units_decreased,
            movements,
        })
    }

    /// Order volume and revenue over an optional date window.
    #[instrument(skip(self))]
    pub async fn sales_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<SalesReport, ServiceError> {
        let mut query = order::Entity::find();
        if let Some(from) = from {
            query = query.filter(order::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(order::Column::CreatedAt.lte(to));
        }

        let total_orders = query
            .clone()
            .count(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let orders = query
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::from_db)?;

        let mut orders_by_status: HashMap<String, u64> = HashMap::new();
        let mut total_revenue = Decimal::ZERO;
        let mut billable = 0u64;

        for o in &orders {
            *orders_by_status.entry(o.status.clone()).or_insert(0) += 1;
            if o.status != OrderStatus::Cancelled.as_str() {
                total_revenue += o.total;
                billable += 1;
            }
        }

        let average_order_value = if billable > 0 {
            total_revenue / Decimal::from(billable)
        } else {
            Decimal::ZERO
        };

        Ok(SalesReport {
            total_orders,
            total_revenue,
            average_order_value,
            orders_by_status,
        })
    }
}
