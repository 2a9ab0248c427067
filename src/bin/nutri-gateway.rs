use clap::arg;
use clap::command;
use clap::Parser;
use nutri_gateway::config::credentials::ClientCredentials;
use nutri_gateway::config::loader::file_to_config;
use nutri_gateway::observability::metrics::get_metrics;
use nutri_gateway::provider::build_gateway;
use nutri_gateway::server;
use nutri_gateway::server::server::AppState;
use nutri_gateway::serving::ServingNormalizer;
use nutri_gateway::utils::logging;
use anyhow::Result;
use nutri_gateway::utils::logging::LogLevel;
use std::path::Path;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "nutri-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "FATSECRET_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,
    #[arg(long, env = "FATSECRET_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args and env
    // -------------------------------

    let args = Args::parse();

    // -------------------------------
    // 2. Load YAML config
    // -------------------------------

    let service_config = file_to_config(Path::new(&args.config)).await?;
    logging::run(&service_config, args.log_level).await?;
    let settings = &service_config.settings;

    // -------------------------------
    // 3. Credentials: absence is fatal at startup
    // -------------------------------

    let credentials = ClientCredentials::from_options(args.client_id, args.client_secret)?;
    info!(client_id = %credentials.client_id(), "client credentials loaded");

    // -------------------------------
    // 4. Token manager + provider gateway
    // -------------------------------

    let gateway = build_gateway(settings, credentials)?;
    let normalizer = ServingNormalizer::from_settings(&settings.serving);

    // -------------------------------
    // 5. Start http server
    // -------------------------------

    let state = AppState::new(get_metrics().await, gateway, normalizer);
    info!("Service starting...");
    server::server::start(settings, state).await
}
