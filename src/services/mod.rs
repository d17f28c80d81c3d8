pub mod action_loop;
pub mod context_discovery;
pub mod resource_context;

pub use action_loop::{ActionDetermineLoop, DecisionPhases};
pub use context_discovery::ContextDiscoveryLoop;
pub use resource_context::{ContextEntry, ResourceContext};
