use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use group_resolver::function::Function;
use group_resolver::keycloak::{KeycloakClient, KeycloakRest};
use group_resolver::server;
use group_resolver::utils::config_loader;
use group_resolver::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "group-resolver.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build identity provider client and its caches
    // -------------------------------

    let provider = Arc::new(KeycloakRest::new(&service_config.identity_provider)?);
    let client = KeycloakClient::new(provider, &service_config.cache);
    let function = Arc::new(Function::new(client, &service_config.settings));

    // -------------------------------
    // 3. Serve
    // -------------------------------

    info!(
        realm = %service_config.identity_provider.realm,
        url = %service_config.identity_provider.url,
        "Service starting..."
    );
    server::server::start(&service_config.settings, function).await
}
