//! Larder
//!
//! An MCP server for recipes, shopping lists and kitchen inventory.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use larder::build_info;
use larder::config::{Config, DEFAULT_LOG_DIRECTIVE};
use larder::db;
use larder::mcp::LarderService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    tracing::info!(
        database = %config.database_path.display(),
        system = config.default_system.as_str(),
        "larder ready"
    );

    let service = LarderService::new(config.database_path, database, config.default_system);

    // Start the MCP server on the stdio transport
    let server = service.serve((stdin(), stdout())).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
