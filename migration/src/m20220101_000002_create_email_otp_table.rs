use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum EmailOtp {
    Table,
    Id,
    Email,
    Purpose,
    OtpHash,
    CreatedAt,
    ExpiresAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(EmailOtp::Table)
                .if_not_exists()
                .col(ColumnDef::new(EmailOtp::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(EmailOtp::Email).string().not_null())
                .col(ColumnDef::new(EmailOtp::Purpose).string_len(16).not_null())
                .col(ColumnDef::new(EmailOtp::OtpHash).string().not_null())
                .col(ColumnDef::new(EmailOtp::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .col(ColumnDef::new(EmailOtp::ExpiresAt).timestamp_with_time_zone().not_null())
                .to_owned(),
        ).await?;

        // Lookups are always (email, purpose)
        m.create_index(
            Index::create()
                .name("idx_email_otp_email_purpose")
                .table(EmailOtp::Table)
                .col(EmailOtp::Email)
                .col(EmailOtp::Purpose)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(EmailOtp::Table).if_exists().to_owned()).await
    }
}
