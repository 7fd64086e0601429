use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Session {
    Table,
    Id,
    UserId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PasswordReset {
    Table,
    Id,
    UserId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(Session::Table)
                .if_not_exists()
                .col(ColumnDef::new(Session::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Session::UserId).uuid().not_null())
                .col(ColumnDef::new(Session::TokenHash).string().not_null())
                .col(ColumnDef::new(Session::ExpiresAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Session::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_session_user")
                        .from(Session::Table, Session::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_session_user")
                .table(Session::Table)
                .col(Session::UserId)
                .to_owned(),
        ).await?;

        m.create_table(
            Table::create()
                .table(PasswordReset::Table)
                .if_not_exists()
                .col(ColumnDef::new(PasswordReset::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(PasswordReset::UserId).uuid().not_null())
                .col(ColumnDef::new(PasswordReset::TokenHash).string().not_null())
                .col(ColumnDef::new(PasswordReset::ExpiresAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(PasswordReset::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_password_reset_user")
                        .from(PasswordReset::Table, PasswordReset::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(PasswordReset::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(Session::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
