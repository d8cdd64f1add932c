use crate::{
    constants::{SQLAI_ENGINE, SQLAI_ENGINE_VERSION, SQLAI_MODE},
    errors::PromptError,
    providers::text_to_sql::TextToSqlProvider,
    types::SchemaEntry,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

// --- SQL.AI request structure ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SqlAiRequest<'a> {
    prompt: &'a str,
    engine: &'static str,
    engine_version: &'static str,
    mode: &'static str,
    data_source: &'a [SchemaEntry],
}

// --- SQL.AI Provider implementation ---

/// A provider for the SQL.AI public text-to-SQL API.
#[derive(Clone)]
pub struct SqlAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl fmt::Debug for SqlAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlAiProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl SqlAiProvider {
    /// Creates a new `SqlAiProvider`.
    pub fn new(api_url: String, api_key: String) -> Result<Self, PromptError> {
        if api_key.trim().is_empty() {
            return Err(PromptError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl TextToSqlProvider for SqlAiProvider {
    async fn generate_sql(
        &self,
        prompt: &str,
        schema: &[SchemaEntry],
    ) -> Result<String, PromptError> {
        let request_body = SqlAiRequest {
            prompt,
            engine: SQLAI_ENGINE,
            engine_version: SQLAI_ENGINE_VERSION,
            mode: SQLAI_MODE,
            data_source: schema,
        };

        info!(
            "--> Sending question to SQL.AI ({} schema entries)",
            schema.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::TranslatorRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromptError::TranslatorStatus { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(PromptError::TranslatorRequest)?;
        debug!("<-- SQL.AI response: {}", body);

        parse_sqlai_response(&body)
    }
}

/// Picks the generated query out of a SQL.AI response body.
///
/// A `query` field wins over an `error` field; a body with neither, or one
/// that is not JSON at all, is malformed.
pub fn parse_sqlai_response(body: &str) -> Result<String, PromptError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PromptError::TranslatorMalformed(format!("response is not JSON: {e}")))?;

    if let Some(query) = value.get("query") {
        return match query {
            Value::String(sql) => Ok(sql.clone()),
            other => Err(PromptError::TranslatorMalformed(format!(
                "`query` is not a string: {other}"
            ))),
        };
    }

    match value.get("error") {
        Some(Value::String(message)) => Err(PromptError::TranslatorApi(message.clone())),
        Some(other) => Err(PromptError::TranslatorApi(other.to_string())),
        None => Err(PromptError::TranslatorMalformed(
            "response has neither `query` nor `error`".to_string(),
        )),
    }
}
