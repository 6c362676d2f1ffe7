//! Collaborator contracts.
//!
//! The platform around the core — rule store, metadata store, content
//! store, generation service, queue — is consumed through these narrow
//! traits; implementations live in [`crate::stores`] and behind feature
//! gates.

pub mod generator;
pub mod queue;
pub mod rules;
pub mod store;

pub use generator::Generator;
pub use queue::{Delivery, JobQueue};
pub use rules::RuleStore;
pub use store::{ContentStore, MetadataStore};
