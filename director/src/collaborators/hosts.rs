use async_trait::async_trait;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostsError {
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
    #[error("collection '{0}' has no hosts")]
    NoHosts(String),
}

/// Resolves a collection name to the hosts that store it.
#[async_trait]
pub trait HostsForCollection: Send + Sync {
    /// Candidate hosts for `collection`, in preference order.
    async fn get_host_names(&self, collection: &str) -> Result<Vec<String>, HostsError>;

    /// Whether lookups can be answered yet. Drives the readiness probe.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Collection to hosts mapping fixed at startup.
#[derive(Debug, Default)]
pub struct StaticHostsForCollection {
    collections: HashMap<String, Vec<String>>,
}

impl StaticHostsForCollection {
    pub fn new(collections: HashMap<String, Vec<String>>) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl HostsForCollection for StaticHostsForCollection {
    async fn get_host_names(&self, collection: &str) -> Result<Vec<String>, HostsError> {
        let hosts = self
            .collections
            .get(collection)
            .ok_or_else(|| HostsError::UnknownCollection(collection.to_string()))?;

        if hosts.is_empty() {
            return Err(HostsError::NoHosts(collection.to_string()));
        }

        Ok(hosts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_hosts() {
        let hosts = StaticHostsForCollection::new(HashMap::from([
            ("c1".to_string(), vec!["h1".to_string(), "h2".to_string()]),
            ("empty".to_string(), vec![]),
        ]));

        assert!(hosts.is_ready());
        assert_eq!(hosts.get_host_names("c1").await.unwrap(), vec!["h1", "h2"]);
        assert_eq!(
            hosts.get_host_names("c2").await,
            Err(HostsError::UnknownCollection("c2".to_string()))
        );
        assert_eq!(
            hosts.get_host_names("empty").await,
            Err(HostsError::NoHosts("empty".to_string()))
        );
    }
}
