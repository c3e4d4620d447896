//! Services the router consults to take a decision.
//!
//! Each one is a trait so that deployments and tests can swap implementations. The
//! router holds them as `Arc<dyn ...>` and calls them concurrently from many requests.

pub mod availability;
pub mod hosts;
pub mod management_api;

pub use availability::{Availability, AvailabilityError, TcpAvailability};
pub use hosts::{HostsError, HostsForCollection, StaticHostsForCollection};
pub use management_api::{ManagementApiDestinations, RoundRobinDestinations};
