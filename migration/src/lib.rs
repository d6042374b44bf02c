pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_monitors_table;
mod m20250601_000002_create_monitor_checks_table;
mod m20250601_000003_create_cron_jobs_table;
mod m20250601_000004_create_cron_executions_table;
mod m20250601_000005_create_incidents_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_monitors_table::Migration),
            Box::new(m20250601_000002_create_monitor_checks_table::Migration),
            Box::new(m20250601_000003_create_cron_jobs_table::Migration),
            Box::new(m20250601_000004_create_cron_executions_table::Migration),
            Box::new(m20250601_000005_create_incidents_table::Migration),
        ]
    }
}
