//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: JSON-file repositories and the transition journal,
//!   built on the `record-store` crate.
//!
//! Adapters are thin translators between domain types and stored records.
//! They contain no business logic.

pub mod persistence;
