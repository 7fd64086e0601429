use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Reminder {
    Table,
    Id,
    UserId,
    Email,
    Message,
    RemindAt,
    IsReminded,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(Reminder::Table)
                .if_not_exists()
                .col(ColumnDef::new(Reminder::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Reminder::UserId).uuid().not_null())
                .col(ColumnDef::new(Reminder::Email).string().not_null())
                .col(ColumnDef::new(Reminder::Message).text().not_null())
                .col(ColumnDef::new(Reminder::RemindAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Reminder::IsReminded).boolean().not_null().default(false))
                .col(ColumnDef::new(Reminder::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Reminder::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_reminder_user")
                        .from(Reminder::Table, Reminder::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        // The scheduler scans pending rows by due time
        m.create_index(
            Index::create()
                .name("idx_reminder_pending_due")
                .table(Reminder::Table)
                .col(Reminder::IsReminded)
                .col(Reminder::RemindAt)
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_reminder_user")
                .table(Reminder::Table)
                .col(Reminder::UserId)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(Reminder::Table).if_exists().to_owned()).await
    }
}
