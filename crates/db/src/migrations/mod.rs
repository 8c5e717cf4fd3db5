//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_events_table;
mod m20250601_000003_create_groups_table;
mod m20250601_000004_create_group_members_table;
mod m20250601_000005_create_event_invitations_table;
mod m20250601_000006_create_group_invitations_table;
mod m20250601_000007_create_rsvps_table;
mod m20250601_000008_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_events_table::Migration),
            Box::new(m20250601_000003_create_groups_table::Migration),
            Box::new(m20250601_000004_create_group_members_table::Migration),
            Box::new(m20250601_000005_create_event_invitations_table::Migration),
            Box::new(m20250601_000006_create_group_invitations_table::Migration),
            Box::new(m20250601_000007_create_rsvps_table::Migration),
            Box::new(m20250601_000008_create_comments_table::Migration),
        ]
    }
}
