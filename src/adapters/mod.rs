//! Adapters for the decision engine's ports.

pub mod memory_repository;
pub mod tracing_channel;

pub use memory_repository::{AspectNode, ElementNode, InMemoryResourceRepository, ResourceTree};
pub use tracing_channel::TracingChannel;
