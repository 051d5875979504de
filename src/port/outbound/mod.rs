//! Outbound ports: what the engine needs from the outside world.

pub mod gateway;
pub mod subscriber;

pub use gateway::{JobKind, JobOutput, NoRows, PersistCallback, PersistenceGateway};
pub use subscriber::{Subscriber, SubscriberRegistry};
