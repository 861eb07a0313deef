use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use segmenta::application::ProcessQueryUseCase;
use segmenta::infrastructure::config::Settings;
use segmenta::infrastructure::db::{DataStore, PostgrestStore};
use segmenta::infrastructure::llm_clients::{LLMClient, RouterClient};
use segmenta::interfaces::http::start_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let store: Arc<dyn DataStore + Send + Sync> = Arc::new(PostgrestStore::new(&settings.datastore));

    let pipeline = Arc::new(ProcessQueryUseCase::new(
        llm_client,
        store,
        settings.llm_config(),
        settings.pipeline_options(),
    ));

    let logs = Arc::new(Mutex::new(Vec::new()));

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let server = start_server(pipeline, logs, &host, port)?;

    info!(host = %host, port, "HTTP server started");
    server.await
}
