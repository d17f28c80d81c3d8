//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces the decision engine consumes:
//! - ResourceRepository: location resolution and similarity search
//! - Tool / ToolSet: name-keyed capabilities the goal executor invokes
//! - ExecutionChannel: user-visible side channel
//! - Phase traits: assessor, discoverer, analyser, decider, refinement analyzer
//! - GoalTranslator / GoalDecider: where goals come from
//!
//! These traits define the contracts that keep the loops independent of any
//! particular inference backend or storage engine.

pub mod channel;
pub mod goal_source;
pub mod phases;
pub mod resource_repository;
pub mod tool;

pub use channel::ExecutionChannel;
pub use goal_source::{GoalDecider, GoalTranslator};
pub use phases::{
    ActionDecider, ActionDeterminer, AnalysisInput, ContextAnalyser, ContextDiscoverer,
    DecisionInput, DiscoveryInput, PursuitAssessor, RefinementAnalyzer, VerdictInput,
};
pub use resource_repository::ResourceRepository;
pub use tool::{ParameterKind, Tool, ToolOutput, ToolParameter, ToolSet};
