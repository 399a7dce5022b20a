mod common;

use common::TestContext;
use inventpro_api::{
    entities::manual_inventory::AdjustmentType,
    services::{
        manual_inventory::AdjustStockInput,
        orders::{CreateOrderInput, OrderItemInput},
    },
};
use rust_decimal::Decimal;

#[tokio::test]
async fn inventory_report_classifies_stock_levels() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;

    let healthy = ctx.seed_product(50).await;
    let _low = ctx.seed_product(2).await;
    let _out = ctx.seed_product(0).await;
    let backordered = ctx.seed_product(1).await;

    ctx.services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id: backordered,
            user_id,
            adjustment_type: AdjustmentType::Decrease,
            quantity: 4,
            reason: Some("oversold".to_string()),
        })
        .await
        .expect("adjust");

    let report = ctx
        .services
        .reports
        .inventory_report(5)
        .await
        .expect("report");

    assert_eq!(report.total_products, 4);
    assert_eq!(report.out_of_stock_products, 1);
    assert_eq!(report.backordered_products, 1);
    // Low stock includes the 2-unit, 0-unit and backordered products.
    assert_eq!(report.low_stock.len(), 3);
    assert!(report
        .low_stock
        .iter()
        .all(|p| p.product_id != healthy));
    // Backordered product sorts first.
    assert_eq!(report.low_stock[0].stock, -3);
}

#[tokio::test]
async fn movements_report_totals_directions() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(10).await;

    for quantity in [5, 7] {
        ctx.services
            .manual_inventory
            .adjust_stock(AdjustStockInput {
                product_id,
                user_id,
                adjustment_type: AdjustmentType::Increase,
                quantity,
                reason: None,
            })
            .await
            .expect("adjust");
    }
    ctx.services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id,
            user_id,
            adjustment_type: AdjustmentType::Decrease,
            quantity: 3,
            reason: Some("breakage".to_string()),
        })
        .await
        .expect("adjust");

    let report = ctx
        .services
        .reports
        .movements_report(Some(product_id), None, None)
        .await
        .expect("report");

    assert_eq!(report.total_movements, 3);
    assert_eq!(report.units_increased, 12);
    assert_eq!(report.units_decreased, 3);
}

#[tokio::test]
async fn sales_report_excludes_cancelled_revenue() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(100).await;

    let (kept, _) = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 2,
            }],
        })
        .await
        .expect("order");

    let (dropped, _) = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 10,
            }],
        })
        .await
        .expect("order");
    ctx.services
        .orders
        .cancel_order(dropped.id)
        .await
        .expect("cancel");

    let report = ctx
        .services
        .reports
        .sales_report(None, None)
        .await
        .expect("report");

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.total_revenue, kept.total);
    assert_eq!(report.average_order_value, kept.total);
    assert_eq!(report.orders_by_status.get("pending"), Some(&1));
    assert_eq!(report.orders_by_status.get("cancelled"), Some(&1));
    assert_eq!(report.total_revenue, Decimal::new(39_980, 2));
}
