//! # Application State
//!
//! The shared application state handed to every handler: configuration, the
//! connectors used to reach MongoDB and MySQL, and the registry of open query
//! sessions.

use crate::config::AppConfig;
use geosql::{
    providers::{
        db::{mysql::MySqlConnector, storage::StorageConnector},
        places::{mongo::MongoTarget, MongoPlaceConnector, PlaceStoreConnector},
    },
    QuerySession,
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::RwLock, task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

struct SessionEntry {
    session: Arc<QuerySession>,
    last_used: Instant,
}

/// Open query sessions, keyed by the id handed out on connect.
///
/// Each session owns its own connection; the registry only decides which
/// one a request talks to. Every lookup refreshes the session's idle clock.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: QuerySession) -> Uuid {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            session: Arc::new(session),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        info!(session_id = %id, "Registered query session");
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<QuerySession>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Arc<QuerySession>> {
        self.sessions.write().await.remove(id).map(|entry| entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Closes and forgets every session unused for at least `max_idle`.
    /// Returns how many were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let expired: Vec<(Uuid, Arc<QuerySession>)> = {
            let mut sessions = self.sessions.write().await;
            let now = Instant::now();
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| now.duration_since(entry.last_used) >= max_idle)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.session)))
                .collect()
        };

        for (id, session) in &expired {
            if let Err(e) = session.close().await {
                warn!(session_id = %id, "Closing an idle session failed: {e}");
            }
            info!(session_id = %id, "Evicted idle query session");
        }
        expired.len()
    }
}

/// Periodically evicts sessions idle for longer than `max_idle`.
pub fn spawn_idle_sweeper(registry: SessionRegistry, max_idle: Duration) -> JoinHandle<()> {
    let period = (max_idle / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(max_idle).await;
            if evicted > 0 {
                debug!(evicted, "Idle session sweep finished");
            }
        }
    })
}

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// Opens a fresh place-store connection for every restaurant search.
    pub place_connector: Arc<dyn PlaceStoreConnector>,
    /// Opens the relational connection behind a new query session.
    pub storage_connector: Arc<dyn StorageConnector>,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Builds a state around explicit connectors.
    pub fn with_connectors(
        config: AppConfig,
        place_connector: Arc<dyn PlaceStoreConnector>,
        storage_connector: Arc<dyn StorageConnector>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            place_connector,
            storage_connector,
            sessions: SessionRegistry::default(),
        }
    }
}

/// Builds the production state: MongoDB for places, MySQL for query sessions.
pub fn build_app_state(config: AppConfig) -> AppState {
    let target = MongoTarget {
        uri: config.mongo.uri.clone(),
        database: config.mongo.database.clone(),
        collection: config.mongo.collection.clone(),
    };
    AppState::with_connectors(
        config,
        Arc::new(MongoPlaceConnector::new(target)),
        Arc::new(MySqlConnector),
    )
}
