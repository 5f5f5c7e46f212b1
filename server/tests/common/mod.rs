use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

const DB_NAME: &str = "todos";

/// A throwaway Postgres instance with the todos schema migrated.
pub struct TodosDb {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

impl TodosDb {
    /// Starts a fresh container, creates the `todos` database and runs all
    /// migrations against it.
    pub async fn new() -> anyhow::Result<Self> {
        // Allow multiple calls to init for tests.
        let _ = tracing_subscriber::fmt().try_init();
        let container = postgres::Postgres::default()
            .with_db_name(DB_NAME)
            .start()
            .await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgres://postgres:postgres@{host}:{port}/{DB_NAME}");
        let db = Database::connect(&db_url).await?;
        migration::Migrator::up(&db, None).await?;
        Ok(Self { container, db })
    }
}
