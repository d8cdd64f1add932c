pub mod sqlai;

use crate::{errors::PromptError, types::SchemaEntry};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use sqlai::SqlAiProvider;

/// A remote service that turns a natural-language question into SQL.
///
/// Implementations receive the question together with the flat schema list
/// captured when the session was opened, and return the generated SQL string
/// untouched.
#[async_trait]
pub trait TextToSqlProvider: Send + Sync + Debug + DynClone {
    async fn generate_sql(
        &self,
        prompt: &str,
        schema: &[SchemaEntry],
    ) -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(TextToSqlProvider);
