pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_user_table;
mod m20220101_000002_create_email_otp_table;
mod m20220101_000003_create_session_tables;
mod m20220101_000004_create_reminder_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_user_table::Migration),
            Box::new(m20220101_000002_create_email_otp_table::Migration),
            Box::new(m20220101_000003_create_session_tables::Migration),
            Box::new(m20220101_000004_create_reminder_table::Migration),
        ]
    }
}
