use crate::{
    constants::{DEFAULT_MYSQL_DATABASE, DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_USER},
    errors::{GeoError, PromptError},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A `(longitude, latitude)` pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting values outside the WGS84 ranges.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidCoordinate(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidCoordinate(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

/// One `(table, column, type)` triple from schema introspection.
///
/// Serialized with the field names the text-to-SQL service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub table: String,
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl SchemaEntry {
    pub fn new(table: &str, column: &str, column_type: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            column_type: column_type.to_string(),
        }
    }
}

/// Credentials for opening a relational query session.
#[derive(Clone, Deserialize)]
pub struct DbCredentials {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_host() -> String {
    DEFAULT_MYSQL_HOST.to_string()
}

fn default_user() -> String {
    DEFAULT_MYSQL_USER.to_string()
}

fn default_database() -> String {
    DEFAULT_MYSQL_DATABASE.to_string()
}

impl Default for DbCredentials {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            user: default_user(),
            password: String::new(),
            database: default_database(),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl DbCredentials {
    /// Rejects credentials the session cannot be opened with.
    pub fn validate(&self) -> Result<(), PromptError> {
        if self.password.is_empty() {
            return Err(PromptError::MissingPassword);
        }
        Ok(())
    }
}

/// Rows and column names returned by the relational engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The single value of a one-row, one-column result.
    pub fn scalar(&self) -> Option<&Value> {
        match (self.columns.len(), self.rows.as_slice()) {
            (1, [row]) => row.first(),
            _ => None,
        }
    }
}

/// The outcome of one question: the SQL the service produced and what it returned.
#[derive(Debug, Clone, Serialize)]
pub struct PromptResult {
    pub generated_sql: String,
    pub result: QueryResult,
}
