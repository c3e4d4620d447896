use crate::config::ValidationError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplies the destination for requests addressed to the bare service domain.
pub trait ManagementApiDestinations: Send + Sync {
    /// Returns a `host:port` destination.
    fn next(&self) -> String;
}

/// Rotates over a fixed list of destinations.
#[derive(Debug)]
pub struct RoundRobinDestinations {
    destinations: Vec<String>,
    counter: AtomicUsize,
}

impl RoundRobinDestinations {
    pub fn try_new(destinations: Vec<String>) -> Result<Self, ValidationError> {
        if destinations.is_empty() {
            return Err(ValidationError::EmptyDestinations);
        }

        Ok(Self {
            destinations,
            counter: AtomicUsize::new(0),
        })
    }
}

impl ManagementApiDestinations for RoundRobinDestinations {
    fn next(&self) -> String {
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % self.destinations.len();
        self.destinations[index].clone()
    }
}
