//! The generation engine: submission dispatch, status polling, artifact
//! spooling, and lifecycle events.
//!
//! [`GenerationEngine`] drives one job at a time from validation through
//! provider submission, bounded polling, result normalization, and the
//! durable history record. Progress is published on a broadcast channel;
//! call [`GenerationEngine::subscribe`] to receive it.

pub mod dispatcher;
pub mod error;
pub mod events;
pub mod poller;
pub mod spool;

pub use dispatcher::GenerationEngine;
pub use error::EngineError;
pub use events::EngineEvent;
pub use spool::ArtifactSpool;
