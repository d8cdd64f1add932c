#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Mock place stores, relational storage and text-to-SQL providers, so the
//! flows can be exercised without MongoDB, MySQL or the network.

use async_trait::async_trait;
use dotenvy::dotenv;
use geosql::{
    errors::{GeoError, PromptError},
    providers::{
        db::storage::{Storage, StorageConnector},
        places::{PlaceStore, PlaceStoreConnector},
        text_to_sql::TextToSqlProvider,
    },
    types::{DbCredentials, QueryResult, SchemaEntry},
};
use mongodb::bson::Document;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Once, RwLock,
};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

// --- Mock Place Store ---

#[derive(Debug, Default)]
pub struct PlaceStoreCalls {
    pub filters: RwLock<Vec<Document>>,
    pub index_calls: RwLock<usize>,
    pub closed: AtomicBool,
}

#[derive(Debug, Clone)]
pub struct MockPlaceStore {
    pub places: Vec<Document>,
    pub index_error: Option<String>,
    pub find_error: Option<String>,
    pub calls: Arc<PlaceStoreCalls>,
}

#[async_trait]
impl PlaceStore for MockPlaceStore {
    async fn ensure_geo_index(&self) -> Result<(), GeoError> {
        *self.calls.index_calls.write().unwrap() += 1;
        match &self.index_error {
            Some(msg) => Err(GeoError::Index(msg.clone())),
            None => Ok(()),
        }
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, GeoError> {
        self.calls.filters.write().unwrap().push(filter);
        match &self.find_error {
            Some(msg) => Err(GeoError::Query(msg.clone())),
            None => Ok(self.places.clone()),
        }
    }

    async fn close(&self) {
        self.calls.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct MockPlaceConnector {
    pub store: MockPlaceStore,
    pub connect_error: Option<String>,
}

impl MockPlaceConnector {
    pub fn with_places(places: Vec<Document>) -> Self {
        Self {
            store: MockPlaceStore {
                places,
                index_error: None,
                find_error: None,
                calls: Arc::new(PlaceStoreCalls::default()),
            },
            connect_error: None,
        }
    }

    pub fn calls(&self) -> Arc<PlaceStoreCalls> {
        self.store.calls.clone()
    }
}

#[async_trait]
impl PlaceStoreConnector for MockPlaceConnector {
    async fn connect(&self) -> Result<Box<dyn PlaceStore>, GeoError> {
        match &self.connect_error {
            Some(msg) => Err(GeoError::Connection(msg.clone())),
            None => Ok(Box::new(self.store.clone())),
        }
    }
}

// --- Mock Text-to-SQL Provider ---

#[derive(Clone, Debug)]
pub struct MockTextToSql {
    pub call_history: Arc<RwLock<Vec<(String, Vec<SchemaEntry>)>>>,
    pub response: Result<String, String>,
}

impl MockTextToSql {
    pub fn returning(sql: &str) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            response: Ok(sql.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            response: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl TextToSqlProvider for MockTextToSql {
    async fn generate_sql(
        &self,
        prompt: &str,
        schema: &[SchemaEntry],
    ) -> Result<String, PromptError> {
        self.call_history
            .write()
            .unwrap()
            .push((prompt.to_string(), schema.to_vec()));
        self.response.clone().map_err(PromptError::TranslatorApi)
    }
}

// --- Mock Storage Provider ---

/// An in-memory stand-in for a MySQL database.
///
/// `tables` maps a table name to its `(column, type)` pairs; `results` maps
/// an exact SQL string to what executing it returns.
#[derive(Clone, Debug, Default)]
pub struct MockStorage {
    pub tables: Vec<(String, Vec<(String, String)>)>,
    pub results: HashMap<String, QueryResult>,
    pub fail_introspection: bool,
    pub executed: Arc<RwLock<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl MockStorage {
    /// The single-table `students(id INT, credits INT)` database.
    pub fn students() -> Self {
        Self {
            tables: vec![(
                "students".to_string(),
                vec![
                    ("id".to_string(), "INT".to_string()),
                    ("credits".to_string(), "INT".to_string()),
                ],
            )],
            ..Default::default()
        }
    }

    pub fn with_result(mut self, sql: &str, result: QueryResult) -> Self {
        self.results.insert(sql.to_string(), result);
        self
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn name(&self) -> &str {
        "MockDB"
    }

    async fn list_tables(&self) -> Result<Vec<String>, PromptError> {
        if self.fail_introspection {
            return Err(PromptError::StorageQueryFailed(
                "SHOW TABLES denied".to_string(),
            ));
        }
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<(String, String)>, PromptError> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| PromptError::StorageQueryFailed(format!("no table {table}")))
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult, PromptError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PromptError::SessionClosed);
        }
        self.executed.write().unwrap().push(sql.to_string());
        self.results.get(sql).cloned().ok_or_else(|| {
            PromptError::StorageQueryFailed(format!("You have an error in your SQL syntax: {sql}"))
        })
    }

    async fn close(&self) -> Result<(), PromptError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MockStorageConnector {
    pub storage: MockStorage,
    pub connect_error: Option<String>,
}

#[async_trait]
impl StorageConnector for MockStorageConnector {
    async fn connect(&self, _credentials: &DbCredentials) -> Result<Box<dyn Storage>, PromptError> {
        match &self.connect_error {
            Some(msg) => Err(PromptError::StorageConnection(msg.clone())),
            None => Ok(Box::new(self.storage.clone())),
        }
    }
}
