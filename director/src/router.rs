use crate::collaborators::{Availability, HostsForCollection, ManagementApiDestinations};
use crate::collection::parse_collection_name;
use crate::config::RouterConfig;
use crate::errors::RoutingError;
use crate::metrics_defs::{ROUTE_DECISIONS, ROUTE_DURATION};
use crate::method_ports::MethodPortTable;
use hyper::{Request, Version};
use hyper::header::HOST;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

/// Decides which backend `host:port` should receive a request.
///
/// Requests for the bare service domain go to the management API. Requests for
/// `<collection>.<service domain>` go to one of the collection's hosts that is
/// currently available, on the read or write port depending on the method.
///
/// The router holds no per-request state and can be shared across tasks.
pub struct Router {
    service_domain: String,
    ports: MethodPortTable,
    management_api: Arc<dyn ManagementApiDestinations>,
    hosts_for_collection: Arc<dyn HostsForCollection>,
    availability: Arc<dyn Availability>,
}

impl Router {
    pub fn new(
        config: RouterConfig,
        management_api: Arc<dyn ManagementApiDestinations>,
        hosts_for_collection: Arc<dyn HostsForCollection>,
        availability: Arc<dyn Availability>,
    ) -> Self {
        Self {
            service_domain: config.service_domain.trim().to_ascii_lowercase(),
            ports: MethodPortTable::new(config.read_port, config.write_port),
            management_api,
            hosts_for_collection,
            availability,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.hosts_for_collection.is_ready()
    }

    /// Returns the `host:port` destination for `req`.
    pub async fn route<B>(&self, req: &Request<B>) -> Result<String, RoutingError> {
        let start = Instant::now();
        let result = self.decide(req).await;

        let status = match &result {
            Ok(destination) => {
                tracing::debug!(
                    method = %req.method(),
                    destination = %destination,
                    "Routed request"
                );
                200
            }
            Err(e) => {
                tracing::debug!(method = %req.method(), error = %e, "Could not route request");
                e.status().as_u16()
            }
        };
        counter!(ROUTE_DECISIONS, "status" => status.to_string()).increment(1);
        histogram!(ROUTE_DURATION).record(start.elapsed().as_secs_f64());

        result
    }

    async fn decide<B>(&self, req: &Request<B>) -> Result<String, RoutingError> {
        // Matching is case-insensitive; messages quote the name as sent.
        let received_host = routing_host_name(req)?;
        let routing_host = received_host.to_ascii_lowercase();

        if !routing_host.ends_with(&self.service_domain) {
            return Err(RoutingError::not_found(format!(
                "Invalid HOST '{received_host}'"
            )));
        }

        if routing_host == self.service_domain {
            return Ok(self.management_api.next());
        }

        let port = self.ports.port_for(req.method()).ok_or_else(|| {
            RoutingError::bad_request(format!("Unknown method '{}'", req.method()))
        })?;

        let collection =
            parse_collection_name(&routing_host, &self.service_domain).ok_or_else(|| {
                RoutingError::not_found(format!("Unparseable host name '{received_host}'"))
            })?;

        // The lookup error is not surfaced: an unresolvable collection is reported
        // the same way as an unknown one.
        let hosts = self
            .hosts_for_collection
            .get_host_names(collection)
            .await
            .map_err(|e| {
                tracing::debug!(collection, error = %e, "Host lookup failed");
                RoutingError::not_found(format!("no hosts for collection '{collection}'"))
            })?;

        let available = self
            .availability
            .available_hosts(&hosts, port)
            .await
            .map_err(|e| {
                tracing::warn!(collection, port, error = %e, "Availability check failed");
                RoutingError::internal_server_error(format!("collection '{collection}': {e}"))
            })?;

        // First available host wins. Availability keeps candidate order, so this
        // follows the preference order of the collection's hosts.
        match available.first() {
            Some(host) => Ok(format!("{host}:{port}")),
            None => {
                tracing::warn!(collection, port, candidates = hosts.len(), "No hosts available");
                Err(RoutingError::service_unavailable(format!(
                    "no hosts available for collection '{collection}'"
                )))
            }
        }
    }
}

/// Host the request is addressed to, without port.
///
/// HTTP/2 requests have no Host header; hyper puts `:authority` in the URI instead.
/// An HTTP/1.x request without a Host header is rejected even when its request
/// target is in absolute form.
fn routing_host_name<B>(req: &Request<B>) -> Result<&str, RoutingError> {
    let host = match req.headers().get(HOST) {
        Some(value) => value
            .to_str()
            .map_err(|_| RoutingError::bad_request("Invalid HOST header"))?,
        None if req.version() == Version::HTTP_2 => req
            .uri()
            .host()
            .ok_or_else(|| RoutingError::bad_request("HOST header not found"))?,
        None => return Err(RoutingError::bad_request("HOST header not found")),
    };

    Ok(host.split_once(':').map_or(host, |(name, _port)| name))
}
