use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Registrations::ActivityId).uuid().not_null())
                    .col(
                        ColumnDef::new(Registrations::Status)
                            .string_len(20)
                            .not_null()
                            .default("registered"),
                    )
                    .col(
                        ColumnDef::new(Registrations::RegistrationTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Registrations::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Registrations::Table, Registrations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Registrations::Table, Registrations::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Registrations::Table)
                    .col(Registrations::ActivityId)
                    .name("idx_registrations_activity_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Registrations::Table)
                    .col(Registrations::UserId)
                    .name("idx_registrations_user_id")
                    .to_owned(),
            )
            .await?;
        // Partial unique index: at most one non-cancelled registration per
        // (user, activity). sea-query has no WHERE clause on indexes, so raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_registrations_live \
                 ON registrations (user_id, activity_id) \
                 WHERE status <> 'cancelled'",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    UserId,
    ActivityId,
    Status,
    RegistrationTime,
    Notes,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
}
