//! Pluggable decision phases.
//!
//! Each phase is an async function over plain data. A model-backed phase and
//! a deterministic rule-based stub are interchangeable; the loops never
//! depend on how a phase reaches its answer. Phases do not retry themselves.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ActionDecision, Directive, DiscoveryPlan, Goal, PursuitAssessment, PursuitProgress,
    RefinementPlan, RefinementVerdict, SearchRecord, SegmentView, StepOutcome, WorkspaceSnapshot,
};

use super::channel::ExecutionChannel;
use super::tool::ToolSet;

/// Everything the discovery phase sees.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryInput<'a> {
    pub goal: &'a Goal,
    pub assessment: &'a PursuitAssessment,
    pub snapshot: &'a WorkspaceSnapshot,
    /// Most recent searches, oldest first
    pub search_history: &'a [SearchRecord],
    pub expanded_tools: &'a ToolSet,
    pub collapsed_tools: &'a ToolSet,
}

/// Everything the relevance-refinement phase sees.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub goal: &'a Goal,
    pub assessment: &'a PursuitAssessment,
    pub segments: &'a [SegmentView],
    pub expanded_tools: &'a ToolSet,
    pub collapsed_tools: &'a ToolSet,
    /// Analysis the discovery phase gave for this round
    pub discovery_analysis: &'a str,
}

/// Everything the action decider sees.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub goal: &'a Goal,
    pub assessment: &'a PursuitAssessment,
    pub completed_steps: &'a [StepOutcome],
    pub segments: &'a [SegmentView],
    pub expanded_tools: &'a ToolSet,
}

/// Everything the refinement/approval phase sees.
#[derive(Debug, Clone, Copy)]
pub struct VerdictInput<'a> {
    pub goal: &'a Goal,
    pub assessment: &'a PursuitAssessment,
    pub decision: &'a ActionDecision,
    pub completed_steps: &'a [StepOutcome],
    pub segments: &'a [SegmentView],
    pub expanded_tools: &'a ToolSet,
    pub collapsed_tools: &'a ToolSet,
}

/// Turns raw execution history into a structured assessment.
#[async_trait]
pub trait PursuitAssessor: Send + Sync {
    async fn assess(
        &self,
        progress: &PursuitProgress,
        beliefs: &[String],
    ) -> DomainResult<PursuitAssessment>;
}

/// Grows the workspace.
#[async_trait]
pub trait ContextDiscoverer: Send + Sync {
    async fn discover(&self, input: DiscoveryInput<'_>) -> DomainResult<DiscoveryPlan>;
}

/// Prunes, redacts and reorders the workspace.
#[async_trait]
pub trait ContextAnalyser: Send + Sync {
    async fn analyse(&self, input: AnalysisInput<'_>) -> DomainResult<RefinementPlan>;
}

/// Chooses between running a tool and finalizing.
#[async_trait]
pub trait ActionDecider: Send + Sync {
    async fn decide(&self, input: DecisionInput<'_>) -> DomainResult<ActionDecision>;
}

/// Judges an action decision.
#[async_trait]
pub trait RefinementAnalyzer: Send + Sync {
    async fn analyze(&self, input: VerdictInput<'_>) -> DomainResult<RefinementVerdict>;
}

/// Produces exactly one directive per call.
///
/// Takes `&mut self`: a determiner may carry state across calls (the
/// workspace and the expanded-tool set) and is owned by one pursuit.
#[async_trait]
pub trait ActionDeterminer: Send {
    async fn determine_action(
        &mut self,
        beliefs: &[String],
        progress: &PursuitProgress,
        tools: &ToolSet,
        channel: &dyn ExecutionChannel,
    ) -> DomainResult<Directive>;
}
