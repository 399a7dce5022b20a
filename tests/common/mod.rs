#![allow(dead_code)]

use std::sync::Arc;

use inventpro_api::{
    db::{self, DbConfig, DbPool},
    events::{self, EventSender},
    handlers::AppServices,
};
use tokio::sync::mpsc;

/// Test harness backed by a file SQLite database in a temp directory, with
/// migrations applied and the event processor running.
pub struct TestContext {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: tempfile::TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let db_path = tmp.path().join("inventpro_test.db");

        let cfg = DbConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&cfg)
            .await
            .expect("db connect");
        db::run_migrations(&pool).await.expect("migrations");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(256);
        let sender = Arc::new(EventSender::new(tx));
        let event_task = tokio::spawn(events::process_events(rx));

        let services = AppServices::new(db.clone(), sender);

        Self {
            db,
            services,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    /// Seed a user and return its id.
    pub async fn seed_user(&self, role: &str) -> uuid::Uuid {
        use inventpro_api::services::users::CreateUserInput;

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        self.services
            .users
            .create_user(CreateUserInput {
                name: format!("Test {role}"),
                email: format!("{role}-{suffix}@example.com"),
                password: "super-secret-password".to_string(),
                role: role.to_string(),
            })
            .await
            .expect("seed user")
            .id
    }

    /// Seed a product with the given stock and return its id.
    pub async fn seed_product(&self, stock: i32) -> uuid::Uuid {
        use inventpro_api::services::products::CreateProductInput;
        use rust_decimal::Decimal;

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        self.services
            .products
            .create_product(CreateProductInput {
                name: "Widget".to_string(),
                description: None,
                sku: format!("SKU-{suffix}"),
                price: Decimal::new(19_990, 2),
                stock,
                category_id: None,
                supplier_id: None,
            })
            .await
            .expect("seed product")
            .id
    }

    /// Seed a client with a fresh valid RUT and return the model.
    pub async fn seed_client(&self, rut: &str) -> inventpro_api::entities::client::Model {
        use inventpro_api::services::clients::CreateClientInput;

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        self.services
            .clients
            .create_client(CreateClientInput {
                name: "Cliente de Prueba".to_string(),
                rut: rut.to_string(),
                email: format!("client-{suffix}@example.com"),
                phone: None,
                address: None,
            })
            .await
            .expect("seed client")
    }
}

/// Build a valid RUT string from a body by computing its check digit.
pub fn rut_for_body(body: u32) -> String {
    format!("{}-{}", body, inventpro_api::rut::compute_check_digit(body))
}
