mod common;

use assert_matches::assert_matches;
use common::TestContext;
use inventpro_api::{
    entities::order::OrderStatus,
    errors::ServiceError,
    services::orders::{CreateOrderInput, OrderItemInput, UpdateOrderInput},
};
use rust_decimal::Decimal;

#[tokio::test]
async fn creating_an_order_decrements_stock_and_totals_items() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(10).await;

    let (order, items) = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: Some("entrega urgente".to_string()),
            items: vec![OrderItemInput {
                product_id,
                quantity: 3,
            }],
        })
        .await
        .expect("create order");

    assert_eq!(order.status, "pending");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);
    // Seeded price is 199.90; 3 units -> 599.70.
    assert_eq!(order.total, Decimal::new(59_970, 2));

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 7);
}

#[tokio::test]
async fn ordering_more_than_stock_backorders() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(2).await;

    ctx.services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 5,
            }],
        })
        .await
        .expect("backorder is allowed");

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, -3);
}

#[tokio::test]
async fn cancel_restores_stock_and_blocks_further_changes() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(10).await;

    let (order, _) = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 4,
            }],
        })
        .await
        .expect("create order");

    let cancelled = ctx
        .services
        .orders
        .cancel_order(order.id)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, "cancelled");

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 10, "cancel must restore stock");

    // A cancelled order cannot be cancelled again or moved to completed.
    assert_matches!(
        ctx.services.orders.cancel_order(order.id).await,
        Err(ServiceError::InvalidInput(_))
    );
    assert_matches!(
        ctx.services
            .orders
            .update_order(
                order.id,
                UpdateOrderInput {
                    status: Some(OrderStatus::Completed),
                    notes: None,
                },
            )
            .await,
        Err(ServiceError::InvalidInput(_))
    );
}

#[tokio::test]
async fn delete_only_applies_to_cancelled_orders() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(10).await;

    let (order, _) = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: client.id,
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 1,
            }],
        })
        .await
        .expect("create order");

    assert_matches!(
        ctx.services.orders.delete_order(order.id).await,
        Err(ServiceError::InvalidInput(_))
    );

    ctx.services.orders.cancel_order(order.id).await.expect("cancel");
    ctx.services.orders.delete_order(order.id).await.expect("delete");

    assert!(ctx
        .services
        .orders
        .get_order(&order.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn empty_or_invalid_items_are_rejected() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let client = ctx.seed_client("12345678-5").await;
    let product_id = ctx.seed_product(10).await;

    assert_matches!(
        ctx.services
            .orders
            .create_order(CreateOrderInput {
                client_id: client.id,
                user_id,
                notes: None,
                items: vec![],
            })
            .await,
        Err(ServiceError::ValidationError(_))
    );

    assert_matches!(
        ctx.services
            .orders
            .create_order(CreateOrderInput {
                client_id: client.id,
                user_id,
                notes: None,
                items: vec![OrderItemInput {
                    product_id,
                    quantity: 0,
                }],
            })
            .await,
        Err(ServiceError::ValidationError(_))
    );

    // Nothing was written.
    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 10);
}

#[tokio::test]
async fn unknown_client_is_not_found_and_rolls_back() {
    let ctx = TestContext::new().await;
    let user_id = ctx.seed_user("vendedor").await;
    let product_id = ctx.seed_product(10).await;

    let result = ctx
        .services
        .orders
        .create_order(CreateOrderInput {
            client_id: uuid::Uuid::new_v4(),
            user_id,
            notes: None,
            items: vec![OrderItemInput {
                product_id,
                quantity: 2,
            }],
        })
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let product = ctx
        .services
        .products
        .get_product(&product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 10, "rollback must leave stock untouched");
}
