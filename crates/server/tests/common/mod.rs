//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with in-memory place
//! and relational stores, and points the text-to-SQL client at an
//! `httpmock::MockServer`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use async_trait::async_trait;
use axum::serve;
use geosql::{
    errors::{GeoError, PromptError},
    providers::{
        db::storage::{Storage, StorageConnector},
        places::{PlaceStore, PlaceStoreConnector},
    },
    types::{DbCredentials, QueryResult},
};
use geosql_server::{
    config::{AppConfig, MongoConfig, TextToSqlConfig},
    router,
    state::AppState,
};
use httpmock::MockServer;
use mongodb::bson::{doc, Document};
use reqwest::Client;
use serde_json::Value;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const SQLAI_PATH: &str = "/api/public/v2";

// --- In-memory place store ---

#[derive(Debug, Clone, Default)]
pub struct FakePlaces {
    pub places: Vec<Document>,
    pub connect_error: Option<String>,
    pub filters: Arc<Mutex<Vec<Document>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakePlaces {
    pub fn with_places(places: Vec<Document>) -> Self {
        Self {
            places,
            ..Default::default()
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            connect_error: Some(message.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PlaceStore for FakePlaces {
    async fn ensure_geo_index(&self) -> Result<(), GeoError> {
        Ok(())
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, GeoError> {
        self.filters.lock().unwrap().push(filter);
        Ok(self.places.clone())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlaceStoreConnector for FakePlaces {
    async fn connect(&self) -> Result<Box<dyn PlaceStore>, GeoError> {
        match &self.connect_error {
            Some(msg) => Err(GeoError::Connection(msg.clone())),
            None => Ok(Box::new(self.clone())),
        }
    }
}

pub fn restaurant(name: &str, longitude: f64, latitude: f64) -> Document {
    doc! {
        "name": name,
        "location": { "type": "Point", "coordinates": [longitude, latitude] },
    }
}

// --- In-memory relational store ---

/// A `students(id INT, credits INT)` database whose query results are
/// looked up by exact SQL text.
#[derive(Debug, Clone)]
pub struct FakeDatabase {
    pub results: HashMap<String, QueryResult>,
    pub connect_error: Option<String>,
    pub executed: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeDatabase {
    pub fn students() -> Self {
        Self {
            results: HashMap::new(),
            connect_error: None,
            executed: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_result(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.results.insert(
            sql.to_string(),
            QueryResult {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FakeDatabase {
    fn name(&self) -> &str {
        "FakeDB"
    }

    async fn list_tables(&self) -> Result<Vec<String>, PromptError> {
        Ok(vec!["students".to_string()])
    }

    async fn describe_table(&self, _table: &str) -> Result<Vec<(String, String)>, PromptError> {
        Ok(vec![
            ("id".to_string(), "INT".to_string()),
            ("credits".to_string(), "INT".to_string()),
        ])
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult, PromptError> {
        if self.is_closed() {
            return Err(PromptError::SessionClosed);
        }
        self.executed.lock().unwrap().push(sql.to_string());
        self.results.get(sql).cloned().ok_or_else(|| {
            PromptError::StorageQueryFailed(format!(
                "You have an error in your SQL syntax near '{sql}'"
            ))
        })
    }

    async fn close(&self) -> Result<(), PromptError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl StorageConnector for FakeDatabase {
    async fn connect(&self, _credentials: &DbCredentials) -> Result<Box<dyn Storage>, PromptError> {
        match &self.connect_error {
            Some(msg) => Err(PromptError::StorageConnection(msg.clone())),
            None => Ok(Box::new(self.clone())),
        }
    }
}

// --- Full Application Test Harness ---

/// Spawns the server on a random port and shuts it down on drop.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(FakePlaces::default(), FakeDatabase::students()).await
    }

    pub async fn spawn_with(places: FakePlaces, database: FakeDatabase) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let config = AppConfig {
            port: 0,
            session_idle_secs: 1800,
            mongo: MongoConfig {
                uri: "mongodb://unused".to_string(),
                database: "geo".to_string(),
                collection: "restaurant".to_string(),
            },
            text_to_sql: TextToSqlConfig {
                api_url: mock_server.url(SQLAI_PATH),
            },
        };
        let app_state = AppState::with_connectors(config, Arc::new(places), Arc::new(database));
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Opens a session with the default credentials and returns its id.
    pub async fn open_session(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/sessions", self.address))
            .json(&serde_json::json!({ "api_key": "test-key", "password": "secret" }))
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        body["result"]["session_id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("no session_id in {body}"))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
