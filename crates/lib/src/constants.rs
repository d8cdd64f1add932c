//! # Shared Constants
//!
//! Defaults and fixed values shared by the server and the CLI.

/// Approximate Earth radius in miles, used to turn a search radius into radians.
pub const EARTH_RADIUS_MILES: f64 = 3963.2;

/// The document field holding each place's GeoJSON point.
pub const LOCATION_FIELD: &str = "location";

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_MONGO_DATABASE: &str = "geo";
pub const DEFAULT_MONGO_COLLECTION: &str = "restaurant";

/// Default search centre (Harlem, Manhattan) and radius in miles.
pub const DEFAULT_LONGITUDE: f64 = -73.93414657;
pub const DEFAULT_LATITUDE: f64 = 40.82302903;
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_USER: &str = "root";
pub const DEFAULT_MYSQL_DATABASE: &str = "student_data";

/// The public SQL.AI text-to-SQL endpoint.
pub const SQLAI_API_URL: &str = "https://api.sqlai.ai/api/public/v2";
pub const SQLAI_ENGINE: &str = "mysql";
pub const SQLAI_ENGINE_VERSION: &str = "8.0";
pub const SQLAI_MODE: &str = "textToSQL";

pub const CSV_FILE_NAME: &str = "query_results.csv";
pub const CSV_MIME: &str = "text/csv";
