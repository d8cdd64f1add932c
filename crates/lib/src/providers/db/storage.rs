use crate::{
    errors::PromptError,
    types::{DbCredentials, QueryResult, SchemaEntry},
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, info};

/// A trait for interacting with a relational storage backend.
///
/// This trait defines the surface the query session needs: schema
/// introspection, verbatim execution, and an explicit close.
#[async_trait]
pub trait Storage: Send + Sync + Debug {
    /// Returns the name of the storage provider (e.g., "MySQL").
    fn name(&self) -> &str;

    /// Lists every table in the connected database.
    async fn list_tables(&self) -> Result<Vec<String>, PromptError>;

    /// Returns `(column, type)` pairs for one table, in definition order.
    async fn describe_table(&self, table: &str) -> Result<Vec<(String, String)>, PromptError>;

    /// Executes a SQL statement exactly as given and fetches every row.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult, PromptError>;

    /// Closes the underlying connection. Later calls fail with `SessionClosed`.
    async fn close(&self) -> Result<(), PromptError>;
}

/// Opens `Storage` connections from user-supplied credentials.
#[async_trait]
pub trait StorageConnector: Send + Sync + Debug {
    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Storage>, PromptError>;
}

/// Enumerates all tables, then all columns of each, into a flat schema list.
pub async fn introspect_schema(storage: &dyn Storage) -> Result<Vec<SchemaEntry>, PromptError> {
    let tables = storage.list_tables().await?;
    info!("Introspecting {} table(s) on {}", tables.len(), storage.name());

    let mut schema = Vec::new();
    for table in &tables {
        let columns = storage.describe_table(table).await?;
        debug!(table = %table, columns = columns.len(), "Described table");
        schema.extend(
            columns
                .into_iter()
                .map(|(column, column_type)| SchemaEntry {
                    table: table.clone(),
                    column,
                    column_type,
                }),
        );
    }
    Ok(schema)
}
