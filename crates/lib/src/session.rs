//! # Query Session
//!
//! A `QuerySession` is one open relational connection together with the
//! schema captured when it was opened and the text-to-SQL provider bound to
//! the user's API key. It is created by `open`, used by `ask`, and released by
//! `close`; nothing about it lives in global state.

use crate::{
    errors::PromptError,
    providers::{
        db::storage::{introspect_schema, Storage, StorageConnector},
        text_to_sql::{SqlAiProvider, TextToSqlProvider},
    },
    types::{DbCredentials, PromptResult, QueryResult, SchemaEntry},
};
use std::fmt;
use tracing::{error, info, warn};

pub struct QuerySession {
    storage: Box<dyn Storage>,
    translator: Box<dyn TextToSqlProvider>,
    schema: Vec<SchemaEntry>,
    warnings: Vec<String>,
}

impl fmt::Debug for QuerySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySession")
            .field("storage", &self.storage)
            .field("translator", &self.translator)
            .field("schema_entries", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl QuerySession {
    /// Wraps an already connected storage and eagerly captures its schema.
    ///
    /// A failed introspection does not fail the session: it is kept
    /// connected with an empty schema and the failure is recorded as a warning.
    pub async fn open(storage: Box<dyn Storage>, translator: Box<dyn TextToSqlProvider>) -> Self {
        let mut warnings = Vec::new();
        let schema = match introspect_schema(storage.as_ref()).await {
            Ok(schema) => schema,
            Err(e) => {
                let e = match e {
                    PromptError::StorageQueryFailed(msg) => PromptError::SchemaIntrospection(msg),
                    other => other,
                };
                warn!("{e}");
                warnings.push(e.to_string());
                Vec::new()
            }
        };
        info!(
            "Query session opened on {} with {} schema entries",
            storage.name(),
            schema.len()
        );
        Self {
            storage,
            translator,
            schema,
            warnings,
        }
    }

    /// Validates the user's inputs, connects, and opens a session against SQL.AI.
    ///
    /// The API key is checked before the password, and both before any
    /// network traffic.
    pub async fn connect(
        connector: &dyn StorageConnector,
        credentials: &DbCredentials,
        api_url: &str,
        api_key: &str,
    ) -> Result<Self, PromptError> {
        let translator = SqlAiProvider::new(api_url.to_string(), api_key.to_string())?;
        credentials.validate()?;

        let storage = connector.connect(credentials).await.map_err(|e| {
            error!("Database connection failed: {e}");
            e
        })?;
        Ok(Self::open(storage, Box::new(translator)).await)
    }

    pub fn schema(&self) -> &[SchemaEntry] {
        &self.schema
    }

    /// Non-fatal problems hit while opening the session.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Sends the question and the captured schema to the text-to-SQL provider.
    pub async fn translate(&self, question: &str) -> Result<String, PromptError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PromptError::EmptyQuestion);
        }
        info!("[translate] received question: {:?}", question);
        let sql = self.translator.generate_sql(question, &self.schema).await?;
        info!("[translate] generated SQL: {}", sql);
        Ok(sql)
    }

    /// Executes SQL verbatim on the session's connection.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, PromptError> {
        self.storage.execute_query(sql).await.map_err(|e| {
            error!("[execute] Query execution error: {e}");
            e
        })
    }

    /// Translates the question and, only if that succeeded, runs the generated SQL.
    pub async fn ask(&self, question: &str) -> Result<PromptResult, PromptError> {
        let generated_sql = self.translate(question).await?;
        let result = self.execute(&generated_sql).await?;
        Ok(PromptResult {
            generated_sql,
            result,
        })
    }

    /// Closes the underlying connection.
    pub async fn close(&self) -> Result<(), PromptError> {
        self.storage.close().await
    }
}
