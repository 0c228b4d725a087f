use axum::Router;
use letter_cluster::aggregator::{self, service::Aggregator};
use letter_cluster::config::{NodeConfig, NodeRole, USAGE};
use letter_cluster::membership::{
    self,
    service::{Coordinator, announce},
    types::{Endpoint, Role},
};
use letter_cluster::processor::{self, service::ShardProcessor};
use letter_cluster::sidecar::Sidecar;
use letter_cluster::validator::{self, service::Validator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match NodeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    tracing::info!("Starting {} on {}", config.role, config.bind);

    let sidecar = Sidecar::http(config.retry, config.request_timeout);

    // 1. Role service and router:
    let app: Router = match config.role {
        NodeRole::Coordinator => membership::handlers::router(Coordinator::new(sidecar.clone())),
        NodeRole::Worker(Role::ShardProcessor) => processor::handlers::router(
            ShardProcessor::new(sidecar.clone(), config.initial_range),
        ),
        NodeRole::Worker(Role::Validator) => {
            validator::handlers::router(Validator::new(sidecar.clone()))
        }
        NodeRole::Worker(Role::Aggregator) => aggregator::handlers::router(Aggregator::new()),
    };

    // 2. Listener:
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    // 3. Self-registration, once the server is accepting:
    if let NodeRole::Worker(role) = config.role {
        let endpoint = Endpoint::new(role, config.advertise.clone());
        let coordinator_url = config.coordinator_url.clone();
        let delay = config.register_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match announce(&sidecar, &coordinator_url, &endpoint).await {
                Ok(reply) if reply.is_success() => {
                    tracing::info!("Registered with coordinator as {}: {}", role, reply.body);
                }
                Ok(reply) => {
                    tracing::error!(
                        "Coordinator refused registration ({}): {}",
                        reply.status,
                        reply.body
                    );
                }
                Err(e) => tracing::error!("Failed to register with coordinator: {}", e),
            }
        });
    }

    tracing::info!("Press Ctrl+C to shutdown");
    axum::serve(listener, app).await?;

    Ok(())
}
