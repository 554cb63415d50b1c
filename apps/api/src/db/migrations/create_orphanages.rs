use super::Migration;
use crate::db::schema::{ColumnType, SchemaHandle, TableColumn, TableDefinition};
use crate::error::SchemaError;
use async_trait::async_trait;

pub struct CreateOrphanages;

impl CreateOrphanages {
    pub fn definition() -> TableDefinition {
        TableDefinition::new(
            "orphanages",
            vec![
                TableColumn::primary_key("id"),
                TableColumn::new("name", ColumnType::Varchar),
                TableColumn::new("latitude", ColumnType::Real),
                TableColumn::new("longitude", ColumnType::Real),
                TableColumn::new("about", ColumnType::Text),
                TableColumn::new("instructions", ColumnType::Text),
                TableColumn::new("opening_hours", ColumnType::Varchar),
                TableColumn::new("open_on_weekends", ColumnType::Boolean).default_value("0"),
            ],
        )
    }
}

#[async_trait]
impl Migration for CreateOrphanages {
    fn timestamp(&self) -> i64 {
        1_602_625_302_000
    }

    fn name(&self) -> &'static str {
        "CreateOrphanages1602625302000"
    }

    async fn apply(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.create_table(&Self::definition()).await
    }

    async fn revert(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.drop_table("orphanages").await
    }
}
