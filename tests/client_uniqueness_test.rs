mod common;

use assert_matches::assert_matches;
use common::{rut_for_body, TestContext};
use inventpro_api::{errors::ServiceError, services::clients::CreateClientInput};

#[tokio::test]
async fn rut_is_normalized_on_write() {
    let ctx = TestContext::new().await;

    let created = ctx
        .services
        .clients
        .create_client(CreateClientInput {
            name: "Cliente".to_string(),
            rut: "12.345.678-5".to_string(),
            email: "Someone@Example.COM".to_string(),
            phone: None,
            address: None,
        })
        .await
        .expect("create");

    assert_eq!(created.rut, "12345678-5");
    assert_eq!(created.email, "someone@example.com");
}

#[tokio::test]
async fn invalid_rut_is_rejected() {
    let ctx = TestContext::new().await;

    let result = ctx
        .services
        .clients
        .create_client(CreateClientInput {
            name: "Cliente".to_string(),
            rut: "12345678-4".to_string(), // wrong check digit
            email: "bad-rut@example.com".to_string(),
            phone: None,
            address: None,
        })
        .await;

    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn duplicate_rut_conflicts_even_with_different_spelling() {
    let ctx = TestContext::new().await;
    ctx.seed_client("12345678-5").await;

    let result = ctx
        .services
        .clients
        .create_client(CreateClientInput {
            name: "Otro Cliente".to_string(),
            rut: "12.345.678-5".to_string(),
            email: "other@example.com".to_string(),
            phone: None,
            address: None,
        })
        .await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_email_is_case_insensitive() {
    let ctx = TestContext::new().await;

    ctx.services
        .clients
        .create_client(CreateClientInput {
            name: "Cliente".to_string(),
            rut: rut_for_body(20_111_222),
            email: "dup@example.com".to_string(),
            phone: None,
            address: None,
        })
        .await
        .expect("first create");

    let result = ctx
        .services
        .clients
        .create_client(CreateClientInput {
            name: "Otro".to_string(),
            rut: rut_for_body(20_111_223),
            email: "DUP@example.com".to_string(),
            phone: None,
            address: None,
        })
        .await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));
}

#[tokio::test]
async fn soft_delete_frees_rut_and_email_for_reuse() {
    let ctx = TestContext::new().await;
    let first = ctx.seed_client("12345678-5").await;

    ctx.services
        .clients
        .delete_client(first.id)
        .await
        .expect("delete");

    // Deleted rows no longer resolve.
    assert!(ctx
        .services
        .clients
        .get_client(&first.id)
        .await
        .unwrap()
        .is_none());

    // The same rut and email are available again.
    let second = ctx
        .services
        .clients
        .create_client(CreateClientInput {
            name: "Cliente Nuevo".to_string(),
            rut: "12345678-5".to_string(),
            email: first.email.clone(),
            phone: None,
            address: None,
        })
        .await
        .expect("recreate after soft delete");

    assert_ne!(second.id, first.id);
    assert_eq!(second.rut, first.rut);
}

#[tokio::test]
async fn update_to_taken_rut_conflicts() {
    let ctx = TestContext::new().await;
    ctx.seed_client("12345678-5").await;
    let other = ctx.seed_client(&rut_for_body(20_111_222)).await;

    let result = ctx
        .services
        .clients
        .update_client(
            other.id,
            inventpro_api::services::clients::UpdateClientInput {
                rut: Some("12.345.678-5".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));
}

// Requires a database with real row-level concurrency (run against Postgres);
// SQLite's single writer serializes the submissions instead of racing them.
// Run with: cargo test -- --ignored concurrent_duplicate_rut
#[tokio::test]
#[ignore]
async fn concurrent_duplicate_rut_creates_exactly_one_client() {
    let ctx = TestContext::new().await;

    let mut tasks = Vec::new();
    for i in 0..2 {
        let clients = ctx.services.clients.clone();
        tasks.push(tokio::spawn(async move {
            clients
                .create_client(CreateClientInput {
                    name: format!("Racer {i}"),
                    rut: "12345678-5".to_string(),
                    email: format!("racer-{i}@example.com"),
                    phone: None,
                    address: None,
                })
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.expect("join") {
            Ok(_) => successes += 1,
            Err(ServiceError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1, "exactly one create may win");
    assert_eq!(conflicts, 1, "the loser must see a conflict");
}
