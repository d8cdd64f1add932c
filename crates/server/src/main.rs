#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geosql_server::start().await
}
