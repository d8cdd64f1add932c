//! # geosql: command-line surface for both query flows
//!
//! `geosql places` runs one restaurant radius search; `geosql schema` and
//! `geosql ask` open a query session against MySQL, use it once, and close it.

mod commands;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use geosql::constants::{
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_MONGO_COLLECTION, DEFAULT_MONGO_DATABASE,
    DEFAULT_MONGO_URI, DEFAULT_MYSQL_DATABASE, DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_USER,
    DEFAULT_RADIUS_MILES, SQLAI_API_URL,
};
use geosql::DbCredentials;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find restaurants within a radius of a point
    Places(PlacesArgs),
    /// Connect to MySQL and print the table/column schema
    Schema(SessionArgs),
    /// Turn a question into SQL with SQL.AI and run it
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct PlacesArgs {
    #[arg(long, default_value_t = DEFAULT_LONGITUDE, allow_negative_numbers = true)]
    longitude: f64,
    #[arg(long, default_value_t = DEFAULT_LATITUDE, allow_negative_numbers = true)]
    latitude: f64,
    /// Search radius in miles
    #[arg(long, default_value_t = DEFAULT_RADIUS_MILES, allow_negative_numbers = true)]
    radius: f64,
    #[arg(long, env = "MONGO_URI", default_value = DEFAULT_MONGO_URI)]
    mongo_uri: String,
    #[arg(long, env = "MONGO_DATABASE", default_value = DEFAULT_MONGO_DATABASE)]
    mongo_database: String,
    #[arg(long, env = "MONGO_COLLECTION", default_value = DEFAULT_MONGO_COLLECTION)]
    mongo_collection: String,
    /// Print the markers as a GeoJSON FeatureCollection instead of a list
    #[arg(long)]
    geojson: bool,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// SQL.AI API key
    #[arg(long, env = "SQLAI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "SQLAI_API_URL", default_value = SQLAI_API_URL)]
    api_url: String,
    #[arg(long, env = "MYSQL_HOST", default_value = DEFAULT_MYSQL_HOST)]
    host: String,
    #[arg(long, env = "MYSQL_PORT")]
    port: Option<u16>,
    #[arg(long, env = "MYSQL_USER", default_value = DEFAULT_MYSQL_USER)]
    user: String,
    #[arg(long, env = "MYSQL_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
    #[arg(long, env = "MYSQL_DATABASE", default_value = DEFAULT_MYSQL_DATABASE)]
    database: String,
}

impl SessionArgs {
    fn credentials(&self) -> DbCredentials {
        DbCredentials {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The question, e.g. "How many students have more than 18 hours of credit?"
    question: String,
    /// Also write the result table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    #[command(flatten)]
    session: SessionArgs,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match &cli.command {
        Commands::Places(args) => commands::handle_places(args).await,
        Commands::Schema(args) => commands::handle_schema(args).await,
        Commands::Ask(args) => commands::handle_ask(args).await,
    }
}
