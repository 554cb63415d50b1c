use super::Migration;
use crate::db::schema::{ColumnType, SchemaHandle, TableColumn};
use crate::error::SchemaError;
use async_trait::async_trait;

pub const TABLE: &str = "orphanages";
pub const COLUMN: &str = "whatsapp_number";

/// Adds the optional contact number to orphanages.
pub struct AddedWhatsappNumber;

impl AddedWhatsappNumber {
    pub fn column() -> TableColumn {
        TableColumn::new(COLUMN, ColumnType::Varchar)
            .nullable()
            .default_null()
    }
}

#[async_trait]
impl Migration for AddedWhatsappNumber {
    fn timestamp(&self) -> i64 {
        1_603_034_899_799
    }

    fn name(&self) -> &'static str {
        "AddedWhatsappNumber1603034899799"
    }

    async fn apply(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.add_column(TABLE, &Self::column()).await
    }

    async fn revert(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError> {
        schema.drop_column(TABLE, COLUMN).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::create_orphanages::CreateOrphanages;
    use crate::db::schema::memory::MemorySchema;
    use crate::db::schema::{ColumnDefault, TableDefinition};
    use proptest::prelude::*;

    async fn migrated_schema() -> MemorySchema {
        let mut schema = MemorySchema::default();
        CreateOrphanages
            .apply(&mut schema)
            .await
            .expect("create orphanages");
        schema
    }

    #[tokio::test]
    async fn apply_adds_nullable_varchar_defaulting_to_null() {
        let mut schema = migrated_schema().await;
        AddedWhatsappNumber.apply(&mut schema).await.expect("apply");

        let columns = schema.columns(TABLE).await.expect("columns");
        let added = columns
            .iter()
            .find(|c| c.name == COLUMN)
            .expect("whatsapp_number present");
        assert_eq!(added.column_type, ColumnType::Varchar);
        assert!(added.nullable);
        assert_eq!(added.default, ColumnDefault::Null);
        assert!(!added.primary);
    }

    #[tokio::test]
    async fn apply_twice_is_a_conflict() {
        let mut schema = migrated_schema().await;
        AddedWhatsappNumber.apply(&mut schema).await.expect("apply");

        let err = AddedWhatsappNumber
            .apply(&mut schema)
            .await
            .expect_err("second apply must fail");
        assert!(matches!(err, SchemaError::ColumnExists { .. }));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn revert_without_column_is_a_conflict() {
        let mut schema = migrated_schema().await;
        let err = AddedWhatsappNumber
            .revert(&mut schema)
            .await
            .expect_err("revert before apply must fail");
        assert!(matches!(err, SchemaError::ColumnMissing { .. }));
    }

    #[tokio::test]
    async fn reapply_after_revert_reproduces_the_column() {
        let mut schema = migrated_schema().await;
        AddedWhatsappNumber.apply(&mut schema).await.expect("apply");
        let first = schema.columns(TABLE).await.expect("columns");

        AddedWhatsappNumber.revert(&mut schema).await.expect("revert");
        AddedWhatsappNumber.apply(&mut schema).await.expect("re-apply");
        let second = schema.columns(TABLE).await.expect("columns");

        assert_eq!(first, second);
    }

    fn arbitrary_column() -> impl Strategy<Value = TableColumn> {
        (
            "[a-v][a-z_]{0,10}",
            prop_oneof![
                Just(ColumnType::Integer),
                Just(ColumnType::Real),
                Just(ColumnType::Varchar),
                Just(ColumnType::Text),
                Just(ColumnType::Boolean),
            ],
            any::<bool>(),
        )
            .prop_map(|(name, column_type, nullable)| {
                let column = TableColumn::new(&name, column_type);
                if nullable {
                    column.nullable()
                } else {
                    column
                }
            })
    }

    proptest! {
        #[test]
        fn revert_undoes_apply_for_any_orphanages_table(
            columns in prop::collection::vec(arbitrary_column(), 0..8),
        ) {
            let mut seen = std::collections::HashSet::new();
            let mut columns = columns;
            columns.retain(|c| seen.insert(c.name.clone()));
            let mut schema = MemorySchema::default();
            schema
                .tables
                .insert(TABLE.to_string(), TableDefinition::new(TABLE, columns));
            let before = schema.clone();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime");
            runtime.block_on(async {
                AddedWhatsappNumber.apply(&mut schema).await.expect("apply");
                AddedWhatsappNumber.revert(&mut schema).await.expect("revert");
            });

            prop_assert_eq!(before, schema);
        }
    }
}
