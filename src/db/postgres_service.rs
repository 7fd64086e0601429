use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct PostgresService {
    pub(crate) database_connection: DatabaseConnection,
}

impl PostgresService {
    pub async fn new(uri: &str) -> Result<Self, DbErr> {
        info!("Connecting to PostgreSQL...");
        let mut opts = ConnectOptions::new(uri.to_owned());
        opts.connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        let database_connection = Database::connect(opts).await?;
        info!("Connected to PostgreSQL. Running migrations...");
        Migrator::up(&database_connection, None).await?;
        info!("Migrations finished.");
        Ok(Self { database_connection })
    }
}
