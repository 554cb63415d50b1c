//! Schema descriptions and the handle migrations mutate them through.

use crate::error::SchemaError;
use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, SqliteConnection};
use std::fmt;

/// Declared column types understood by the migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Varchar,
    Text,
    Boolean,
}

impl ColumnType {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Varchar => "varchar",
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }

    pub fn parse(declared: &str) -> Option<Self> {
        match declared.trim().to_lowercase().as_str() {
            "integer" => Some(Self::Integer),
            "real" => Some(Self::Real),
            "varchar" => Some(Self::Varchar),
            "text" => Some(Self::Text),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Default clause of a column.
///
/// `None` and `Null` are distinct: the first has no `DEFAULT` clause at all,
/// the second is an explicit `DEFAULT NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDefault {
    None,
    Null,
    Literal(String),
}

impl ColumnDefault {
    /// Interprets SQLite's `pragma_table_info.dflt_value`.
    fn from_pragma(value: Option<String>) -> Self {
        match value {
            None => Self::None,
            Some(v) if v.eq_ignore_ascii_case("null") => Self::Null,
            Some(v) => Self::Literal(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: ColumnDefault,
    pub primary: bool,
}

impl TableColumn {
    /// A `NOT NULL` column without default.
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable: false,
            default: ColumnDefault::None,
            primary: false,
        }
    }

    /// Auto-incrementing integer primary key.
    pub fn primary_key(name: &str) -> Self {
        Self {
            primary: true,
            ..Self::new(name, ColumnType::Integer)
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn default_null(mut self) -> Self {
        self.default = ColumnDefault::Null;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: &str) -> Self {
        self.default = ColumnDefault::Literal(value.to_string());
        self
    }

    /// Column definition as it appears in `CREATE TABLE` / `ADD COLUMN`.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.as_sql());
        if self.primary {
            sql.push_str(" PRIMARY KEY");
            if self.column_type == ColumnType::Integer {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        match &self.default {
            ColumnDefault::None => {}
            ColumnDefault::Null => sql.push_str(" DEFAULT NULL"),
            ColumnDefault::Literal(value) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(value);
            }
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<TableColumn>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &str, columns: Vec<TableColumn>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a foreign key that cascades on update and delete.
    #[must_use]
    pub fn foreign_key(mut self, column: &str, references_table: &str, references_column: &str) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            references_table: references_table.to_string(),
            references_column: references_column.to_string(),
        });
        self
    }

    pub fn to_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(TableColumn::to_sql).collect();
        parts.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {}({}) ON UPDATE CASCADE ON DELETE CASCADE",
                fk.column, fk.references_table, fk.references_column
            )
        }));
        format!("CREATE TABLE {} ({})", self.name, parts.join(", "))
    }
}

impl fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Structural operations a migration may perform.
///
/// Implementations must reject conflicting operations (creating an existing
/// table, adding an existing column, dropping something absent) with the
/// matching `SchemaError` variant instead of silently succeeding.
#[async_trait]
pub trait SchemaHandle: Send {
    async fn has_table(&mut self, table: &str) -> Result<bool, SchemaError>;

    /// Columns of `table` in declaration order.
    async fn columns(&mut self, table: &str) -> Result<Vec<TableColumn>, SchemaError>;

    async fn create_table(&mut self, definition: &TableDefinition) -> Result<(), SchemaError>;

    async fn drop_table(&mut self, table: &str) -> Result<(), SchemaError>;

    async fn add_column(&mut self, table: &str, column: &TableColumn) -> Result<(), SchemaError>;

    async fn drop_column(&mut self, table: &str, column: &str) -> Result<(), SchemaError>;

    async fn has_column(&mut self, table: &str, column: &str) -> Result<bool, SchemaError> {
        Ok(self.columns(table).await?.iter().any(|c| c.name == column))
    }
}

/// Schema handle over a live SQLite connection, usually a transaction.
pub struct SqliteSchema<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteSchema<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SchemaHandle for SqliteSchema<'_> {
    async fn has_table(&mut self, table: &str) -> Result<bool, SchemaError> {
        let count: i64 =
            query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(count > 0)
    }

    async fn columns(&mut self, table: &str) -> Result<Vec<TableColumn>, SchemaError> {
        let rows: Vec<(String, String, i64, Option<String>, i64)> = query_as(
            "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(&mut *self.conn)
        .await?;

        if rows.is_empty() {
            return Err(SchemaError::MissingTable {
                table: table.to_string(),
            });
        }

        rows.into_iter()
            .map(|(name, declared, not_null, default, pk)| {
                let column_type =
                    ColumnType::parse(&declared).ok_or_else(|| SchemaError::UnsupportedType {
                        table: table.to_string(),
                        column: name.clone(),
                        declared: declared.clone(),
                    })?;
                Ok(TableColumn {
                    name,
                    column_type,
                    nullable: not_null == 0,
                    default: ColumnDefault::from_pragma(default),
                    primary: pk > 0,
                })
            })
            .collect()
    }

    async fn create_table(&mut self, definition: &TableDefinition) -> Result<(), SchemaError> {
        if self.has_table(&definition.name).await? {
            return Err(SchemaError::TableExists {
                table: definition.name.clone(),
            });
        }
        query(&definition.to_sql()).execute(&mut *self.conn).await?;
        Ok(())
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), SchemaError> {
        if !self.has_table(table).await? {
            return Err(SchemaError::MissingTable {
                table: table.to_string(),
            });
        }
        query(&format!("DROP TABLE {table}"))
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn add_column(&mut self, table: &str, column: &TableColumn) -> Result<(), SchemaError> {
        if self.has_column(table, &column.name).await? {
            return Err(SchemaError::ColumnExists {
                table: table.to_string(),
                column: column.name.clone(),
            });
        }
        query(&format!("ALTER TABLE {table} ADD COLUMN {}", column.to_sql()))
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn drop_column(&mut self, table: &str, column: &str) -> Result<(), SchemaError> {
        if !self.has_column(table, column).await? {
            return Err(SchemaError::ColumnMissing {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        query(&format!("ALTER TABLE {table} DROP COLUMN {column}"))
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_sql_matches_declaration() {
        let column = TableColumn::new("whatsapp_number", ColumnType::Varchar)
            .nullable()
            .default_null();
        assert_eq!(column.to_sql(), "whatsapp_number varchar DEFAULT NULL");

        let id = TableColumn::primary_key("id");
        assert_eq!(id.to_sql(), "id integer PRIMARY KEY AUTOINCREMENT NOT NULL");

        let flag = TableColumn::new("open_on_weekends", ColumnType::Boolean).default_value("0");
        assert_eq!(flag.to_sql(), "open_on_weekends boolean NOT NULL DEFAULT 0");
    }

    #[test]
    fn pragma_defaults_keep_null_distinct_from_absent() {
        assert_eq!(ColumnDefault::from_pragma(None), ColumnDefault::None);
        assert_eq!(
            ColumnDefault::from_pragma(Some("NULL".to_string())),
            ColumnDefault::Null
        );
        assert_eq!(
            ColumnDefault::from_pragma(Some("0".to_string())),
            ColumnDefault::Literal("0".to_string())
        );
    }

    #[test]
    fn table_sql_includes_cascading_foreign_key() {
        let table = TableDefinition::new(
            "images",
            vec![
                TableColumn::primary_key("id"),
                TableColumn::new("orphanage_id", ColumnType::Integer),
            ],
        )
        .foreign_key("orphanage_id", "orphanages", "id");

        assert_eq!(
            table.to_sql(),
            "CREATE TABLE images (id integer PRIMARY KEY AUTOINCREMENT NOT NULL, \
             orphanage_id integer NOT NULL, FOREIGN KEY (orphanage_id) REFERENCES \
             orphanages(id) ON UPDATE CASCADE ON DELETE CASCADE)"
        );
    }

    #[test]
    fn column_type_parse_is_case_insensitive() {
        assert_eq!(ColumnType::parse("VARCHAR"), Some(ColumnType::Varchar));
        assert_eq!(ColumnType::parse("decimal(10,2)"), None);
    }
}
