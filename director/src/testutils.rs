use crate::collaborators::{
    Availability, AvailabilityError, HostsError, HostsForCollection, ManagementApiDestinations,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FixedDestination(pub String);

impl ManagementApiDestinations for FixedDestination {
    fn next(&self) -> String {
        self.0.clone()
    }
}

/// Serves the given collections; anything else is an unknown collection.
pub struct MockHosts {
    collections: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl MockHosts {
    pub fn new(collections: &[(&str, &[&str])]) -> Self {
        let collections = collections
            .iter()
            .map(|(name, hosts)| {
                let hosts = hosts.iter().map(|h| h.to_string()).collect();
                (name.to_string(), hosts)
            })
            .collect();

        Self {
            collections,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HostsForCollection for MockHosts {
    async fn get_host_names(&self, collection: &str) -> Result<Vec<String>, HostsError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| HostsError::UnknownCollection(collection.to_string()))
    }
}

/// Returns a canned answer and records what it was asked.
pub struct MockAvailability {
    answer: Result<Vec<String>, String>,
    requests: Mutex<Vec<(Vec<String>, u16)>>,
}

impl MockAvailability {
    pub fn available(hosts: &[&str]) -> Self {
        Self {
            answer: Ok(hosts.iter().map(|h| h.to_string()).collect()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            answer: Err(detail.to_string()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<String>, u16)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Availability for MockAvailability {
    async fn available_hosts(
        &self,
        hosts: &[String],
        port: u16,
    ) -> Result<Vec<String>, AvailabilityError> {
        self.requests.lock().unwrap().push((hosts.to_vec(), port));
        self.answer.clone().map_err(AvailabilityError::Other)
    }
}
