//! Versioned, reversible schema migrations and the runner that applies them.

pub mod added_whatsapp_number;
pub mod create_images;
pub mod create_orphanages;

use crate::db::schema::{SchemaHandle, SqliteSchema};
use crate::error::{MigrationError, SchemaError};
use async_trait::async_trait;
use sqlx::{query, query_as, FromRow, SqlitePool};

pub use added_whatsapp_number::AddedWhatsappNumber;
pub use create_images::CreateImages;
pub use create_orphanages::CreateOrphanages;

/// A structural change with an exact inverse.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Ordering key; migrations run in ascending timestamp order.
    fn timestamp(&self) -> i64;

    fn name(&self) -> &'static str;

    async fn apply(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError>;

    async fn revert(&self, schema: &mut dyn SchemaHandle) -> Result<(), SchemaError>;
}

/// Every migration shipped with this build.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CreateOrphanages),
        Box::new(CreateImages),
        Box::new(AddedWhatsappNumber),
    ]
}

/// Row of the `migrations` bookkeeping table.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct AppliedMigration {
    pub id: i64,
    pub timestamp: i64,
    pub name: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationStatus {
    pub name: &'static str,
    pub applied: bool,
}

pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(all())
    }
}

impl Migrator {
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> Self {
        migrations.sort_by_key(|m| m.timestamp());
        Self { migrations }
    }

    async fn ensure_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        query(
            "CREATE TABLE IF NOT EXISTS migrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Applied migrations, oldest first.
    pub async fn applied(&self, pool: &SqlitePool) -> Result<Vec<AppliedMigration>, sqlx::Error> {
        Self::ensure_table(pool).await?;
        query_as::<_, AppliedMigration>(
            "SELECT id, timestamp, name FROM migrations ORDER BY timestamp, id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn pending(&self, pool: &SqlitePool) -> Result<Vec<&dyn Migration>, sqlx::Error> {
        let applied = self.applied(pool).await?;
        Ok(self
            .migrations
            .iter()
            .filter(|m| !applied.iter().any(|a| a.name == m.name()))
            .map(AsRef::as_ref)
            .collect())
    }

    pub async fn status(&self, pool: &SqlitePool) -> Result<Vec<MigrationStatus>, sqlx::Error> {
        let applied = self.applied(pool).await?;
        Ok(self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                name: m.name(),
                applied: applied.iter().any(|a| a.name == m.name()),
            })
            .collect())
    }

    /// Applies every pending migration, each in its own transaction.
    ///
    /// Stops at the first failure; migrations applied before it stay applied.
    pub async fn run(&self, pool: &SqlitePool) -> Result<Vec<&'static str>, MigrationError> {
        let pending = self.pending(pool).await?;
        if pending.is_empty() {
            tracing::info!("Database schema up to date");
            return Ok(Vec::new());
        }

        let mut executed = Vec::with_capacity(pending.len());
        for migration in pending {
            tracing::info!("Running migration {}", migration.name());

            let mut tx = pool.begin().await?;
            {
                let mut schema = SqliteSchema::new(&mut tx);
                migration
                    .apply(&mut schema)
                    .await
                    .map_err(|source| MigrationError::Schema {
                        name: migration.name(),
                        source,
                    })?;
            }
            query("INSERT INTO migrations (timestamp, name) VALUES (?, ?)")
                .bind(migration.timestamp())
                .bind(migration.name())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            executed.push(migration.name());
        }

        tracing::info!("Applied {} migration(s)", executed.len());
        Ok(executed)
    }

    /// Reverts the most recently applied migration.
    pub async fn revert_last(&self, pool: &SqlitePool) -> Result<&'static str, MigrationError> {
        let applied = self.applied(pool).await?;
        let last = applied.last().ok_or(MigrationError::NothingToRevert)?;
        let migration = self
            .migrations
            .iter()
            .find(|m| m.name() == last.name)
            .ok_or_else(|| MigrationError::Unknown {
                name: last.name.clone(),
            })?;

        tracing::info!("Reverting migration {}", migration.name());

        let mut tx = pool.begin().await?;
        {
            let mut schema = SqliteSchema::new(&mut tx);
            migration
                .revert(&mut schema)
                .await
                .map_err(|source| MigrationError::Schema {
                    name: migration.name(),
                    source,
                })?;
        }
        query("DELETE FROM migrations WHERE id = ?")
            .bind(last.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(migration.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{ColumnDefault, ColumnType};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool")
    }

    async fn orphanage_columns(pool: &SqlitePool) -> Vec<crate::db::schema::TableColumn> {
        let mut conn = pool.acquire().await.expect("connection");
        SqliteSchema::new(&mut conn)
            .columns("orphanages")
            .await
            .expect("columns")
    }

    #[tokio::test]
    async fn run_applies_all_in_order_and_records_them() {
        let pool = memory_pool().await;
        let migrator = Migrator::default();

        let executed = migrator.run(&pool).await.expect("run");
        assert_eq!(
            executed,
            vec![
                "CreateOrphanages1602625302000",
                "CreateImages1602635213866",
                "AddedWhatsappNumber1603034899799",
            ]
        );

        assert!(migrator.pending(&pool).await.expect("pending").is_empty());
        assert!(migrator.run(&pool).await.expect("second run").is_empty());
        assert!(migrator
            .status(&pool)
            .await
            .expect("status")
            .iter()
            .all(|s| s.applied));
    }

    #[tokio::test]
    async fn sqlite_column_matches_declared_shape() {
        let pool = memory_pool().await;
        Migrator::default().run(&pool).await.expect("run");

        let columns = orphanage_columns(&pool).await;
        let whatsapp = columns
            .iter()
            .find(|c| c.name == "whatsapp_number")
            .expect("column added");
        assert_eq!(whatsapp.column_type, ColumnType::Varchar);
        assert!(whatsapp.nullable);
        assert_eq!(whatsapp.default, ColumnDefault::Null);
        assert_eq!(*whatsapp, AddedWhatsappNumber::column());
    }

    #[tokio::test]
    async fn revert_last_restores_previous_shape() {
        let pool = memory_pool().await;
        let migrator = Migrator::default();
        migrator.run(&pool).await.expect("run");
        let with_column = orphanage_columns(&pool).await;

        let reverted = migrator.revert_last(&pool).await.expect("revert");
        assert_eq!(reverted, "AddedWhatsappNumber1603034899799");

        let without_column = orphanage_columns(&pool).await;
        assert_eq!(without_column.len() + 1, with_column.len());
        assert!(without_column.iter().all(|c| c.name != "whatsapp_number"));
        assert_eq!(
            without_column,
            with_column[..with_column.len() - 1].to_vec()
        );

        // Re-applying reproduces the identical column definition.
        migrator.run(&pool).await.expect("re-run");
        assert_eq!(orphanage_columns(&pool).await, with_column);
    }

    #[tokio::test]
    async fn pre_migration_rows_read_back_without_contact() {
        let pool = memory_pool().await;
        let baseline = Migrator::new(vec![Box::new(CreateOrphanages), Box::new(CreateImages)]);
        baseline.run(&pool).await.expect("baseline");

        query(
            "INSERT INTO orphanages (name, latitude, longitude, about, instructions, opening_hours, open_on_weekends)
             VALUES ('Lar Feliz', -22.9, -47.0, 'desc', 'bring ID', '9-5', 1)",
        )
        .execute(&pool)
        .await
        .expect("insert");

        Migrator::default().run(&pool).await.expect("upgrade");

        let record = crate::db::queries::get_orphanage_by_id(&pool, 1)
            .await
            .expect("query")
            .expect("row present");
        assert_eq!(record.name, "Lar Feliz");
        assert_eq!(record.whatsapp_number, None);
    }

    #[tokio::test]
    async fn conflicting_schema_aborts_without_recording() {
        let pool = memory_pool().await;
        Migrator::new(vec![Box::new(CreateOrphanages)])
            .run(&pool)
            .await
            .expect("baseline");
        query("ALTER TABLE orphanages ADD COLUMN whatsapp_number varchar")
            .execute(&pool)
            .await
            .expect("manual column");

        let migrator = Migrator::new(vec![Box::new(CreateOrphanages), Box::new(AddedWhatsappNumber)]);
        let err = migrator.run(&pool).await.expect_err("conflict");
        assert!(matches!(
            err,
            MigrationError::Schema {
                source: SchemaError::ColumnExists { .. },
                ..
            }
        ));
        assert_eq!(migrator.pending(&pool).await.expect("pending").len(), 1);
    }

    #[tokio::test]
    async fn revert_with_nothing_applied_is_reported() {
        let pool = memory_pool().await;
        let err = Migrator::default()
            .revert_last(&pool)
            .await
            .expect_err("nothing applied");
        assert!(matches!(err, MigrationError::NothingToRevert));
    }
}
