use dotenvy::dotenv;
use geosql::{
    constants::SQLAI_API_URL, providers::db::mysql::MySqlConnector, DbCredentials, QuerySession,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging and load .env file
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} '<question>'", args[0]);
        eprintln!();
        eprintln!(
            "Example: {} 'How many students have more than 18 hours of credit?'",
            args[0]
        );
        return Ok(());
    }

    // --- Configuration from environment variables ---
    let api_key = env::var("SQLAI_API_KEY").unwrap_or_default();
    let api_url = env::var("SQLAI_API_URL").unwrap_or_else(|_| SQLAI_API_URL.to_string());
    let mut credentials = DbCredentials::default();
    if let Ok(host) = env::var("MYSQL_HOST") {
        credentials.host = host;
    }
    if let Ok(user) = env::var("MYSQL_USER") {
        credentials.user = user;
    }
    if let Ok(database) = env::var("MYSQL_DATABASE") {
        credentials.database = database;
    }
    credentials.password = env::var("MYSQL_PASSWORD").unwrap_or_default();

    let session = QuerySession::connect(&MySqlConnector, &credentials, &api_url, &api_key).await?;
    println!("--- Schema ({} columns) ---", session.schema().len());
    for entry in session.schema() {
        println!("{}.{} {}", entry.table, entry.column, entry.column_type);
    }

    let outcome = session.ask(&args[1]).await;
    session.close().await?;
    let prompt_result = outcome?;

    println!("\n--- Generated SQL ---");
    println!("{}", prompt_result.generated_sql);
    println!("\n--- Result ---");
    println!("{}", serde_json::to_string_pretty(&prompt_result.result)?);

    Ok(())
}
