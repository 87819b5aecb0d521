//! Bizflow: Propagation Rule Engine.
//!
//! Maps a triggering event type to a derived business action. Actions either
//! hand an entity change to the mutation collaborator or publish new events,
//! which cascade depth first through the bus before the rule's result is
//! recorded.

pub mod application;
pub mod domain;
