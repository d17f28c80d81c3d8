//! Action-determination loop.
//!
//! Composes the discovery sub-loop, the action decider and the
//! refinement/approval phase into one bounded decision per call:
//!
//! 1. Assess progress once.
//! 2. Settle the workspace, decide, judge.
//! 3. Approve returns the decision, unless it runs a tool before
//!    `min_iterations` rounds have passed. Refine replaces the assessment.
//! 4. When the budget runs out, the last decision is returned unapproved.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    DecisionConfig, Directive, Judgment, PursuitProgress, Resolution,
};
use crate::domain::ports::{
    ActionDecider, ActionDeterminer, ContextAnalyser, ContextDiscoverer, DecisionInput,
    ExecutionChannel, PursuitAssessor, RefinementAnalyzer, ToolSet, VerdictInput,
};

use super::context_discovery::ContextDiscoveryLoop;
use super::resource_context::ResourceContext;

/// The five pluggable phases one loop is built from.
#[derive(Clone)]
pub struct DecisionPhases {
    pub assessor: Arc<dyn PursuitAssessor>,
    pub discoverer: Arc<dyn ContextDiscoverer>,
    pub analyser: Arc<dyn ContextAnalyser>,
    pub decider: Arc<dyn ActionDecider>,
    pub refiner: Arc<dyn RefinementAnalyzer>,
}

/// Resource-aware action determiner.
///
/// The loop owns its workspace and its set of expanded tool names for its
/// whole lifetime; both carry over between `determine_action` calls. Build a
/// fresh loop per goal when nothing should carry over between goals.
pub struct ActionDetermineLoop {
    context: ResourceContext,
    expanded_tools: HashSet<String>,
    discovery: ContextDiscoveryLoop,
    assessor: Arc<dyn PursuitAssessor>,
    decider: Arc<dyn ActionDecider>,
    refiner: Arc<dyn RefinementAnalyzer>,
    max_iterations: Option<u32>,
    min_iterations: u32,
}

impl ActionDetermineLoop {
    pub fn new(context: ResourceContext, phases: DecisionPhases, config: &DecisionConfig) -> Self {
        Self {
            context,
            expanded_tools: HashSet::new(),
            discovery: ContextDiscoveryLoop::new(
                phases.discoverer,
                phases.analyser,
                config.max_iterations,
            ),
            assessor: phases.assessor,
            decider: phases.decider,
            refiner: phases.refiner,
            max_iterations: config.max_iterations,
            min_iterations: config.min_iterations,
        }
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ResourceContext {
        &mut self.context
    }

    /// Names of tools whose full schemas are currently shown to the phases.
    pub fn expanded_tools(&self) -> &HashSet<String> {
        &self.expanded_tools
    }

    fn budget_spent(&self, iteration: u32) -> bool {
        self.max_iterations.is_some_and(|max| iteration >= max)
    }
}

#[async_trait]
impl ActionDeterminer for ActionDetermineLoop {
    #[instrument(skip_all, fields(goal_id = %progress.goal.id))]
    async fn determine_action(
        &mut self,
        beliefs: &[String],
        progress: &PursuitProgress,
        tools: &ToolSet,
        channel: &dyn ExecutionChannel,
    ) -> DomainResult<Directive> {
        let goal = &progress.goal;
        let mut assessment = self.assessor.assess(progress, beliefs).await?;
        let mut iteration = 0;
        let mut last = Directive::Resolution(Resolution::budget_exhausted());

        while !self.budget_spent(iteration) {
            iteration = self
                .discovery
                .run(
                    &mut self.context,
                    &mut self.expanded_tools,
                    goal,
                    &assessment,
                    tools,
                    iteration,
                    channel,
                )
                .await?;
            debug!(iteration, "Context discovery completed");

            let snapshot = self.context.snapshot().await;
            let (expanded, _) = tools.partition(&self.expanded_tools);
            let decision = self
                .decider
                .decide(DecisionInput {
                    goal,
                    assessment: &assessment,
                    completed_steps: &progress.executed_steps,
                    segments: &snapshot.segments,
                    expanded_tools: &expanded,
                })
                .await?;
            let directive = decision.to_directive();
            channel
                .info(&format!("Action decision made: {directive} on iteration {iteration}."))
                .await;
            last = directive.clone();

            let snapshot = self.context.snapshot().await;
            let (expanded, collapsed) = tools.partition(&self.expanded_tools);
            let verdict = self
                .refiner
                .analyze(VerdictInput {
                    goal,
                    assessment: &assessment,
                    decision: &decision,
                    completed_steps: &progress.executed_steps,
                    segments: &snapshot.segments,
                    expanded_tools: &expanded,
                    collapsed_tools: &collapsed,
                })
                .await?;

            match verdict.judgment() {
                Ok(Judgment::Approve(_)) => {
                    channel.info("Action decision approved.").await;
                    match directive {
                        Directive::Operation(_) if iteration < self.min_iterations => {
                            debug!(
                                iteration,
                                min_iterations = self.min_iterations,
                                "Approved operation held back until minimum exploration"
                            );
                        }
                        approved => {
                            info!(iteration, directive = %approved, "Directive approved");
                            return Ok(approved);
                        }
                    }
                }
                Ok(Judgment::Refine(refined)) => {
                    channel
                        .info(&format!(
                            "Action decision requires refinement: {}",
                            verdict.analysis
                        ))
                        .await;
                    assessment = refined;
                }
                Err(err) => {
                    warn!(iteration, error = %err, "Discarding malformed refinement verdict");
                    return Ok(Directive::Resolution(Resolution::invalid_decision()));
                }
            }
        }

        info!(iteration, directive = %last, "Iteration budget exhausted, returning last decision");
        Ok(last)
    }
}
