use super::Migration;
use crate::db::schema::{ColumnType, SchemaHandle, TableColumn, TableDefinition};
use crate::error::SchemaError;
use async_trait::async_trait;

/// Images belong to an orphanage and go away with it.
pub struct CreateImages;

impl CreateImages {
    pub fn definition() -> TableDefinition {
        TableDefinition::new(
            "images",
            vec![
                TableColumn::primary_key("id"),
                TableColumn::new("path", ColumnType::Varchar),
                TableColumn::new("orphanage_id", ColumnType::Integer),
            ],
        )
        .foreign_key("orphanage_id", "orphanages", "id")
    }
}

#[async_trait]
impl Migration for CreateImages {
    fn timestamp(&self) -> i64 {
        1_602_635_213_866
    }

    fn name(&self) -> &'static str {
        "CreateImages1602635213866"
    }

    async fn apply(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.create_table(&Self::definition()).await
    }

    async fn revert(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.drop_table("images").await
    }
}
