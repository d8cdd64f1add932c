use crate::{render, AskArgs, PlacesArgs, SessionArgs};
use anyhow::{bail, Context, Result};
use geosql::{
    export::to_csv,
    geo::{present_places, PlacesView},
    providers::{
        db::mysql::MySqlConnector,
        places::{mongo::MongoTarget, MongoPlaceConnector},
    },
    search_places, GeoSearchRequest, QuerySession,
};
use std::fs;
use tracing::{info, warn};

pub async fn handle_places(args: &PlacesArgs) -> Result<()> {
    let connector = MongoPlaceConnector::new(MongoTarget {
        uri: args.mongo_uri.clone(),
        database: args.mongo_database.clone(),
        collection: args.mongo_collection.clone(),
    });
    let request = GeoSearchRequest {
        longitude: args.longitude,
        latitude: args.latitude,
        radius: args.radius,
    };

    let outcome = search_places(&connector, &request).await;
    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }
    if let Some(error) = &outcome.error {
        bail!("{error}");
    }

    match present_places(&outcome.places, args.radius) {
        PlacesView::Found { markers, .. } if args.geojson => {
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
        view => print!("{}", render::places(&view)),
    }
    Ok(())
}

async fn open_session(args: &SessionArgs) -> Result<QuerySession> {
    let session = QuerySession::connect(
        &MySqlConnector,
        &args.credentials(),
        &args.api_url,
        &args.api_key,
    )
    .await?;
    for warning in session.warnings() {
        eprintln!("Warning: {warning}");
    }
    Ok(session)
}

async fn close_session(session: QuerySession) {
    if let Err(e) = session.close().await {
        warn!("Closing the database connection failed: {e}");
    }
}

pub async fn handle_schema(args: &SessionArgs) -> Result<()> {
    let session = open_session(args).await?;
    print!("{}", render::schema(session.schema()));
    close_session(session).await;
    Ok(())
}

pub async fn handle_ask(args: &AskArgs) -> Result<()> {
    let session = open_session(&args.session).await?;
    let outcome = ask(&session, args).await;
    close_session(session).await;
    outcome
}

async fn ask(session: &QuerySession, args: &AskArgs) -> Result<()> {
    let generated_sql = session.translate(&args.question).await?;
    println!("Generated SQL: {generated_sql}");

    let result = session.execute(&generated_sql).await?;
    print!("{}", render::answer(&result));
    if result.is_empty() {
        return Ok(());
    }

    if let Some(path) = &args.csv {
        let body = to_csv(&result)?;
        fs::write(path, body)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        info!("Wrote {} row(s) to {}", result.rows.len(), path.display());
        println!("Saved {} row(s) to {}", result.rows.len(), path.display());
    }
    Ok(())
}
