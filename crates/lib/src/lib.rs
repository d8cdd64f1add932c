//! # geosql
//!
//! Two small query tools sharing one library:
//!
//! - **Restaurant finder** (`geo`): a radius search over a MongoDB collection of
//!   places, rendered as map markers.
//! - **Natural-language query** (`session`): a question is turned into SQL by the
//!   SQL.AI text-to-SQL service and executed against MySQL, with the result
//!   table exportable as CSV.
//!
//! The remote services and databases sit behind traits in `providers` so the
//! server, the CLI and the tests can swap them.

pub mod constants;
pub mod errors;
pub mod export;
pub mod geo;
pub mod providers;
pub mod session;
pub mod types;

pub use errors::{GeoError, PromptError};
pub use geo::{search_places, GeoSearchOutcome, GeoSearchRequest};
pub use session::QuerySession;
pub use types::{Coordinate, DbCredentials, PromptResult, QueryResult, SchemaEntry};
