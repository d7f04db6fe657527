//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Mecenate:
//!
//! - `users`: authentication
//! - `charity_projects`: funding targets collecting donations
//! - `donations`: money given by users, distributed over open projects

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    IsSuperuser,
}

#[derive(Iden)]
enum CharityProjects {
    Table,
    Id,
    Name,
    Description,
    TargetAmount,
    AllocatedAmount,
    FullyFunded,
    OpenedAt,
    ClosedAt,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    UserId,
    Comment,
    TargetAmount,
    AllocatedAmount,
    FullyFunded,
    OpenedAt,
    ClosedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Charity projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CharityProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CharityProjects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CharityProjects::Name).string().not_null())
                    .col(
                        ColumnDef::new(CharityProjects::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::TargetAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::AllocatedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::FullyFunded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::OpenedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CharityProjects::ClosedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-name-unique")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // FIFO query: open projects ordered by opened_at.
        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-fully_funded-opened_at")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::FullyFunded)
                    .col(CharityProjects::OpenedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Donations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::UserId).string().not_null())
                    .col(ColumnDef::new(Donations::Comment).string())
                    .col(
                        ColumnDef::new(Donations::TargetAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::AllocatedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Donations::FullyFunded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Donations::OpenedAt).timestamp().not_null())
                    .col(ColumnDef::new(Donations::ClosedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-user_id")
                            .from(Donations::Table, Donations::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .col(Donations::UserId)
                    .to_owned(),
            )
            .await?;

        // FIFO query: open donations ordered by opened_at.
        manager
            .create_index(
                Index::create()
                    .name("idx-donations-fully_funded-opened_at")
                    .table(Donations::Table)
                    .col(Donations::FullyFunded)
                    .col(Donations::OpenedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CharityProjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
