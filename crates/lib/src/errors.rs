use thiserror::Error;

/// Errors raised by the natural-language query flow.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Please enter your SQL.AI API key")]
    MissingApiKey,
    #[error("Please enter database password")]
    MissingPassword,
    #[error("Please enter a question")]
    EmptyQuestion,
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Database connection error: {0}")]
    StorageConnection(String),
    #[error("Error fetching schema: {0}")]
    SchemaIntrospection(String),
    #[error("Error executing query: {0}")]
    StorageQueryFailed(String),
    #[error("The query session is closed")]
    SessionClosed,
    #[error("Request to text-to-SQL service failed: {0}")]
    TranslatorRequest(reqwest::Error),
    #[error("Text-to-SQL service returned status {status}: {body}")]
    TranslatorStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Error generating SQL: {0}")]
    TranslatorApi(String),
    #[error("Unexpected response format: {0}")]
    TranslatorMalformed(String),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to serialize result: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl PromptError {
    /// True for errors caused by missing or empty user input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PromptError::MissingApiKey | PromptError::MissingPassword | PromptError::EmptyQuestion
        )
    }

    /// True for failures talking to the remote text-to-SQL service.
    pub fn is_translator(&self) -> bool {
        matches!(
            self,
            PromptError::TranslatorRequest(_)
                | PromptError::TranslatorStatus { .. }
                | PromptError::TranslatorApi(_)
                | PromptError::TranslatorMalformed(_)
        )
    }
}

/// Errors raised by the restaurant finder flow.
///
/// None of these escape `search_places`; they are turned into user-facing
/// warnings there.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),
    #[error("Error connecting to MongoDB: {0}")]
    Connection(String),
    #[error("Could not create 2dsphere index: {0}")]
    Index(String),
    #[error("Error fetching data from MongoDB: {0}")]
    Query(String),
}
