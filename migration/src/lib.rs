pub use sea_orm_migration::prelude::*;

mod m20251002_000001_create_users;
mod m20251002_000002_create_services;
mod m20251002_000003_create_projects;
mod m20251009_000004_create_about_and_team;
mod m20251009_000005_create_contact_info;
mod m20251104_000006_create_testimonials;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251002_000001_create_users::Migration),
            Box::new(m20251002_000002_create_services::Migration),
            Box::new(m20251002_000003_create_projects::Migration),
            Box::new(m20251009_000004_create_about_and_team::Migration),
            Box::new(m20251009_000005_create_contact_info::Migration),
            Box::new(m20251104_000006_create_testimonials::Migration),
        ]
    }
}
