//! NutriLog
//!
//! An MCP server for personal nutrition tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nutrilog::app::AppState;
use nutrilog::build_info;
use nutrilog::config::{Config, API_KEY_ENV};
use nutrilog::db;
use nutrilog::mcp::NutriLogService;
use nutrilog::vision::gemini::GeminiAnalyzer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let state = AppState::load(database)?;

    let vision_configured = config.vision.api_key.is_some();
    if !vision_configured {
        warn!("{} is not set; analyze_food_photo will fail until it is", API_KEY_ENV);
    }
    let analyzer = Arc::new(GeminiAnalyzer::new(&config.vision));

    // Create the NutriLog service
    let service = NutriLogService::new(db_path, state, analyzer, vision_configured);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
