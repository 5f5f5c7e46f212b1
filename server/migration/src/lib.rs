pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_todos_table;
mod m20250801_000002_add_title_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_todos_table::Migration),
            Box::new(m20250801_000002_add_title_index::Migration),
        ]
    }
}
