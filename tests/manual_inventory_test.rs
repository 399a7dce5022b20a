mod common;

use assert_matches::assert_matches;
use common::TestContext;
use inventpro_api::{
    entities::manual_inventory::AdjustmentType,
    errors::ServiceError,
    services::manual_inventory::AdjustStockInput,
};
use uuid::Uuid;

#[tokio::test]
async fn increase_updates_stock_and_writes_audit_row() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(10).await;

    let adjustment = ctx
        .services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id,
            user_id,
            adjustment_type: AdjustmentType::Increase,
            quantity: 5,
            reason: None,
        })
        .await
        .expect("adjustment should succeed");

    assert_eq!(adjustment.new_stock, 15);
    assert_eq!(adjustment.record.previous_stock, 10);
    assert_eq!(adjustment.record.new_stock, 15);
    assert_eq!(adjustment.record.adjustment_type, "increase");
    assert_eq!(adjustment.record.quantity, 5);

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 15);

    let (records, total) = ctx
        .services
        .manual_inventory
        .list_adjustments(Some(product_id), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn decrease_below_zero_is_a_backorder() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(10).await;

    let adjustment = ctx
        .services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id,
            user_id,
            adjustment_type: AdjustmentType::Decrease,
            quantity: 15,
            reason: Some("damaged batch".to_string()),
        })
        .await
        .expect("backorder decrease should succeed");

    assert_eq!(adjustment.new_stock, -5);

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, -5);
}

#[tokio::test]
async fn non_positive_quantity_fails_without_state_change() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(10).await;

    for quantity in [0, -3] {
        let result = ctx
            .services
            .manual_inventory
            .adjust_stock(AdjustStockInput {
                product_id,
                user_id,
                adjustment_type: AdjustmentType::Decrease,
                quantity,
                reason: Some("should not matter".to_string()),
            })
            .await;
        assert_matches!(result, Err(ServiceError::ValidationError(_)));
    }

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 10, "stock must be untouched");

    let (_, total) = ctx
        .services
        .manual_inventory
        .list_adjustments(Some(product_id), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 0, "no audit rows may be written");
}

#[tokio::test]
async fn decrease_requires_a_reason() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(10).await;

    for reason in [None, Some("   ".to_string())] {
        let result = ctx
            .services
            .manual_inventory
            .adjust_stock(AdjustStockInput {
                product_id,
                user_id,
                adjustment_type: AdjustmentType::Decrease,
                quantity: 1,
                reason,
            })
            .await;
        assert_matches!(result, Err(ServiceError::ValidationError(_)));
    }

    // Increases need no reason.
    let ok = ctx
        .services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id,
            user_id,
            adjustment_type: AdjustmentType::Increase,
            quantity: 1,
            reason: None,
        })
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn missing_product_yields_not_found() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;

    let result = ctx
        .services
        .manual_inventory
        .adjust_stock(AdjustStockInput {
            product_id: Uuid::new_v4(),
            user_id,
            adjustment_type: AdjustmentType::Increase,
            quantity: 1,
            reason: None,
        })
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn sequential_adjustments_accumulate() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("bodeguero").await;
    let product_id = ctx.seed_product(0).await;

    for _ in 0..4 {
        ctx.services
            .manual_inventory
            .adjust_stock(AdjustStockInput {
                product_id,
                user_id,
                adjustment_type: AdjustmentType::Increase,
                quantity: 3,
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
            quantity: 5,
            reason: Some("shrinkage".to_string()),
        })
        .await
        .expect("adjust");

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 7);

    let (records, total) = ctx
        .services
        .manual_inventory
        .list_adjustments(Some(product_id), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 5);
    let decrease = records
        .iter()
        .find(|r| r.adjustment_type == "decrease")
        .expect("decrease record present");
    assert_eq!(decrease.previous_stock, 12);
    assert_eq!(decrease.new_stock, 7);
}
