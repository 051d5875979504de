//! Port definitions (hexagonal architecture).

pub mod outbound;

pub use outbound::{
    JobKind, JobOutput, NoRows, PersistCallback, PersistenceGateway, Subscriber,
    SubscriberRegistry,
};
