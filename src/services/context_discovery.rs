//! Discovery/refinement sub-loop.
//!
//! Each round grows the workspace from a [`DiscoveryPlan`] and, if anything
//! new was requested, prunes it again from a [`RefinementPlan`]. The round
//! counter is shared with the action loop, so a discoverer that always asks
//! for more still terminates at the iteration budget.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{DiscoveryPlan, Goal, PursuitAssessment, RefinementPlan};
use crate::domain::ports::{
    AnalysisInput, ContextAnalyser, ContextDiscoverer, DiscoveryInput, ExecutionChannel, ToolSet,
};

use super::resource_context::ResourceContext;

pub struct ContextDiscoveryLoop {
    discoverer: Arc<dyn ContextDiscoverer>,
    analyser: Arc<dyn ContextAnalyser>,
    max_iterations: Option<u32>,
}

impl ContextDiscoveryLoop {
    pub fn new(
        discoverer: Arc<dyn ContextDiscoverer>,
        analyser: Arc<dyn ContextAnalyser>,
        max_iterations: Option<u32>,
    ) -> Self {
        Self {
            discoverer,
            analyser,
            max_iterations,
        }
    }

    fn budget_spent(&self, iteration: u32) -> bool {
        self.max_iterations.is_some_and(|max| iteration >= max)
    }

    /// Settle the workspace for one decision round.
    ///
    /// Returns the advanced iteration counter.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        context: &mut ResourceContext,
        expanded_tools: &mut HashSet<String>,
        goal: &Goal,
        assessment: &PursuitAssessment,
        tools: &ToolSet,
        mut iteration: u32,
        channel: &dyn ExecutionChannel,
    ) -> DomainResult<u32> {
        loop {
            iteration += 1;

            let snapshot = context.snapshot().await;
            let (expanded, collapsed) = tools.partition(expanded_tools);
            let plan = self
                .discoverer
                .discover(DiscoveryInput {
                    goal,
                    assessment,
                    snapshot: &snapshot,
                    search_history: context.recent_searches(),
                    expanded_tools: &expanded,
                    collapsed_tools: &collapsed,
                })
                .await?;
            apply_discovery_plan(context, expanded_tools, &plan).await?;

            if !plan.refinement_needed() {
                debug!(iteration, "Discovery settled");
                break;
            }
            channel
                .info(&format!(
                    "Identified need for resources {:?} and searches {:?} on iteration {iteration}.",
                    plan.query_resources, plan.search_queries
                ))
                .await;
            if !plan.expand_tools.is_empty() {
                channel
                    .info(&format!("Expanding tools: {:?}", plan.expand_tools))
                    .await;
            }
            if self.budget_spent(iteration) {
                info!(iteration, "Iteration budget reached during discovery");
                break;
            }

            let snapshot = context.snapshot().await;
            let (expanded, collapsed) = tools.partition(expanded_tools);
            let refinement = self
                .analyser
                .analyse(AnalysisInput {
                    goal,
                    assessment,
                    segments: &snapshot.segments,
                    expanded_tools: &expanded,
                    collapsed_tools: &collapsed,
                    discovery_analysis: &plan.discovery_analysis,
                })
                .await?;
            channel
                .info(&format!(
                    "Excluded resources {:?} and properties {:?} on iteration {iteration}.",
                    refinement.exclude_resources,
                    refinement
                        .exclude_properties
                        .iter()
                        .map(|item| format!("{}:{}", item.location, item.property))
                        .collect::<Vec<_>>()
                ))
                .await;
            apply_refinement_plan(context, expanded_tools, &refinement);
        }

        Ok(iteration)
    }
}

async fn apply_discovery_plan(
    context: &mut ResourceContext,
    expanded_tools: &mut HashSet<String>,
    plan: &DiscoveryPlan,
) -> DomainResult<()> {
    for query in &plan.search_queries {
        context.search(query, None).await?;
    }
    for location in &plan.query_resources {
        context.query(location);
    }
    expanded_tools.extend(plan.expand_tools.iter().cloned());
    Ok(())
}

fn apply_refinement_plan(
    context: &mut ResourceContext,
    expanded_tools: &mut HashSet<String>,
    plan: &RefinementPlan,
) {
    for location in &plan.exclude_resources {
        context.exclude(location);
    }
    for item in &plan.exclude_properties {
        context.exclude_field(&item.location, &item.property);
    }
    for tool in &plan.collapse_tools {
        expanded_tools.remove(tool);
    }
    if !plan.sorted_segments.is_empty() {
        context.sort(&plan.sorted_segments);
    }
}
