pub mod mongo;

use crate::errors::GeoError;
use async_trait::async_trait;
use mongodb::bson::Document;
use std::fmt::Debug;

pub use mongo::{MongoPlaceConnector, MongoPlaceStore};

/// One open connection to a collection of place documents.
#[async_trait]
pub trait PlaceStore: Send + Sync + Debug {
    /// Creates the spherical index on the location field if it is missing.
    async fn ensure_geo_index(&self) -> Result<(), GeoError>;

    /// Returns every document matching `filter`.
    async fn find(&self, filter: Document) -> Result<Vec<Document>, GeoError>;

    /// Releases the connection.
    async fn close(&self);
}

/// Opens a fresh `PlaceStore` for each search.
#[async_trait]
pub trait PlaceStoreConnector: Send + Sync + Debug {
    async fn connect(&self) -> Result<Box<dyn PlaceStore>, GeoError>;
}
