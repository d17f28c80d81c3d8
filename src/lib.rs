//! reckon - goal-driven action determination
//!
//! reckon works a natural-language goal through to a terminal resolution. Each
//! step, an action-determination loop curates a context workspace over a
//! resource repository, asks a decision phase whether to run a tool or
//! finalize, and has a refinement phase approve or send the decision back.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the port traits every phase implements
//! - **Service Layer** (`services`): the context workspace, discovery sub-loop and action loop
//! - **Application Layer** (`application`): the goal executor and its front ends
//! - **Adapters** (`adapters`): in-memory resource repository and tracing channel
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use reckon::application::GoalExecutor;
//! use reckon::services::{ActionDetermineLoop, DecisionPhases, ResourceContext};
//!
//! let context = ResourceContext::new(repository, &config.workspace);
//! let determiner = ActionDetermineLoop::new(context, phases, &config.decision);
//! let mut executor = GoalExecutor::new(config.beliefs.clone(), tools, determiner, channel);
//! let outcome = executor.handle_goal(Goal::from_request("Find Alice's manager", request)).await;
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryResourceRepository, TracingChannel};
pub use application::{AutonomousAgent, GoalExecutor, RequestHandler};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ActionDecision, Config, Directive, Goal, OperationPlan, PursuitOutcome, PursuitStatus,
    RefinementVerdict, Resolution, ResolutionStatus,
};
pub use domain::ports::{
    ActionDeterminer, ExecutionChannel, ResourceRepository, Tool, ToolOutput, ToolSet,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ActionDetermineLoop, DecisionPhases, ResourceContext};
