pub mod collaborators;
pub mod collection;
pub mod config;
pub mod errors;
pub mod method_ports;
pub mod metrics_defs;
pub mod router;
pub mod service;

#[cfg(test)]
mod testutils;

use collaborators::{RoundRobinDestinations, StaticHostsForCollection, TcpAvailability};
use errors::DirectorError;
use router::Router;
use service::DirectorService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

pub use errors::RoutingError;

/// Builds the router from `config` and serves decisions and admin endpoints until
/// one of the listeners fails.
pub async fn run(config: config::Config) -> Result<(), DirectorError> {
    config.validate()?;
    let router_config = config.router_config()?;

    tracing::info!(
        service_domain = %router_config.service_domain,
        read_port = router_config.read_port,
        write_port = router_config.write_port,
        collections = config.collections.len(),
        "Starting director"
    );

    let router = Arc::new(Router::new(
        router_config,
        Arc::new(RoundRobinDestinations::try_new(
            config.management_api.destinations.clone(),
        )?),
        Arc::new(StaticHostsForCollection::new(config.collections.clone())),
        Arc::new(TcpAvailability::new(config.availability.probe_timeout())),
    ));

    let ready_router = router.clone();
    let director_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        DirectorService::new(router),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<_, DirectorError>::new(move || ready_router.is_ready()),
    );

    tokio::try_join!(director_task, admin_task)?;
    Ok(())
}
