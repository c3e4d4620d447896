use crate::metrics_defs::PROBE_FAILURES;
use async_trait::async_trait;
use shared::counter;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinError;
use tokio::time;

#[derive(thiserror::Error, Debug)]
pub enum AvailabilityError {
    #[error("probe of {host} did not complete: {source}")]
    ProbeAborted {
        host: String,
        #[source]
        source: JoinError,
    },
    /// For implementations that ask an external service about host state.
    #[error("{0}")]
    Other(String),
}

/// Narrows a set of candidate hosts down to those currently reachable on a port.
///
/// An empty result is not an error: it means every host was probed and none answered.
#[async_trait]
pub trait Availability: Send + Sync {
    async fn available_hosts(
        &self,
        hosts: &[String],
        port: u16,
    ) -> Result<Vec<String>, AvailabilityError>;
}

/// Considers a host available when a TCP connection to it succeeds within the timeout.
#[derive(Debug, Clone)]
pub struct TcpAvailability {
    probe_timeout: Duration,
}

impl TcpAvailability {
    pub fn new(probe_timeout: Duration) -> Self {
        Self { probe_timeout }
    }
}

async fn probe(host: String, port: u16, probe_timeout: Duration) -> bool {
    match time::timeout(probe_timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            tracing::debug!(host = %host, port, error = %e, "Availability probe failed");
            counter!(PROBE_FAILURES).increment(1);
            false
        }
        Err(_) => {
            tracing::debug!(host = %host, port, "Availability probe timed out");
            counter!(PROBE_FAILURES).increment(1);
            false
        }
    }
}

#[async_trait]
impl Availability for TcpAvailability {
    async fn available_hosts(
        &self,
        hosts: &[String],
        port: u16,
    ) -> Result<Vec<String>, AvailabilityError> {
        // All probes run at once; results are collected in candidate order.
        let probes: Vec<_> = hosts
            .iter()
            .map(|host| {
                let handle = tokio::spawn(probe(host.clone(), port, self.probe_timeout));
                (host, handle)
            })
            .collect();

        let mut available = Vec::with_capacity(probes.len());
        for (host, handle) in probes {
            let reachable = handle
                .await
                .map_err(|source| AvailabilityError::ProbeAborted {
                    host: host.clone(),
                    source,
                })?;
            if reachable {
                available.push(host.clone());
            }
        }

        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn closed_port() -> u16 {
        // Bind then drop so nothing listens on the port afterwards.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_reachable_host() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let availability = TcpAvailability::new(Duration::from_millis(500));
        let hosts = vec!["127.0.0.1".to_string()];

        assert_eq!(
            availability.available_hosts(&hosts, port).await.unwrap(),
            vec!["127.0.0.1"]
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_filtered() {
        let port = closed_port().await;

        let availability = TcpAvailability::new(Duration::from_millis(500));
        let hosts = vec!["127.0.0.1".to_string()];

        assert!(availability.available_hosts(&hosts, port).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preserves_candidate_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let availability = TcpAvailability::new(Duration::from_millis(200));
        // The listener is bound to 127.0.0.1 only
        let hosts = vec![
            "127.0.0.2".to_string(),
            "127.0.0.1".to_string(),
            "127.0.0.2".to_string(),
            "127.0.0.1".to_string(),
        ];

        assert_eq!(
            availability.available_hosts(&hosts, port).await.unwrap(),
            vec!["127.0.0.1", "127.0.0.1"]
        );
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let availability = TcpAvailability::new(Duration::from_millis(500));
        assert!(availability.available_hosts(&[], 80).await.unwrap().is_empty());
    }
}
