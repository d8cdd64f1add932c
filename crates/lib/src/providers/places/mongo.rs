use crate::{
    constants::LOCATION_FIELD,
    errors::GeoError,
    providers::places::{PlaceStore, PlaceStoreConnector},
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::Document,
    Client, Collection, IndexModel,
};
use serde::Deserialize;
use tracing::{debug, info};

/// Where the place documents live.
#[derive(Debug, Clone, Deserialize)]
pub struct MongoTarget {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// A MongoDB collection of places, holding its own client.
#[derive(Debug)]
pub struct MongoPlaceStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoPlaceStore {
    pub async fn connect(target: &MongoTarget) -> Result<Self, GeoError> {
        debug!(uri = %target.uri, "Opening MongoDB client");
        let client = Client::with_uri_str(&target.uri)
            .await
            .map_err(|e| GeoError::Connection(e.to_string()))?;
        let collection = client
            .database(&target.database)
            .collection::<Document>(&target.collection);
        Ok(Self { client, collection })
    }
}

#[async_trait]
impl PlaceStore for MongoPlaceStore {
    async fn ensure_geo_index(&self) -> Result<(), GeoError> {
        let mut keys = Document::new();
        keys.insert(LOCATION_FIELD, "2dsphere");
        let index = IndexModel::builder().keys(keys).build();
        let created = self
            .collection
            .create_index(index)
            .await
            .map_err(|e| GeoError::Index(e.to_string()))?;
        debug!(index = %created.index_name, "2dsphere index is ready");
        Ok(())
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, GeoError> {
        debug!(filter = %filter, "--> Querying MongoDB");
        let cursor = self
            .collection
            .find(filter)
            .await
            .map_err(|e| GeoError::Query(e.to_string()))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| GeoError::Query(e.to_string()))?;
        debug!("<-- MongoDB returned {} document(s)", documents.len());
        Ok(documents)
    }

    async fn close(&self) {
        info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

/// Connects to the configured MongoDB collection on every search.
#[derive(Debug, Clone)]
pub struct MongoPlaceConnector {
    target: MongoTarget,
}

impl MongoPlaceConnector {
    pub fn new(target: MongoTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl PlaceStoreConnector for MongoPlaceConnector {
    async fn connect(&self) -> Result<Box<dyn PlaceStore>, GeoError> {
        Ok(Box::new(MongoPlaceStore::connect(&self.target).await?))
    }
}
