//! GoalExecutor - drives one goal to a terminal outcome
//!
//! Each cycle asks the [`ActionDeterminer`] for a directive. A resolution
//! ends the pursuit; an operation plan is executed by tool name and its
//! outcome appended to the pursuit progress. Tool faults never abort the
//! pursuit. Any error escaping the per-goal loop is absorbed once, at the
//! top, into a failed pursuit outcome.
//!
//! [`RequestHandler`] and [`AutonomousAgent`] are thin front ends that
//! source the goal from a user request or from a goal decider.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Directive, Goal, OperationPlan, PursuitOutcome, PursuitProgress, Resolution,
    ResolutionStatus, StepOutcome,
};
use crate::domain::ports::{
    ActionDeterminer, ExecutionChannel, GoalDecider, GoalTranslator, ToolOutput, ToolSet,
};

/// Executes a single goal. No translation, no goal selection.
pub struct GoalExecutor<D> {
    beliefs: Vec<String>,
    tools: ToolSet,
    determiner: D,
    channel: Arc<dyn ExecutionChannel>,
    max_steps: Option<usize>,
}

impl<D: ActionDeterminer> GoalExecutor<D> {
    pub fn new(
        beliefs: Vec<String>,
        tools: ToolSet,
        determiner: D,
        channel: Arc<dyn ExecutionChannel>,
    ) -> Self {
        Self {
            beliefs,
            tools,
            determiner,
            channel,
            max_steps: None,
        }
    }

    /// Abandon a pursuit once this many steps have been executed.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn beliefs(&self) -> &[String] {
        &self.beliefs
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn determiner(&self) -> &D {
        &self.determiner
    }

    pub fn channel(&self) -> &Arc<dyn ExecutionChannel> {
        &self.channel
    }

    /// Pursue `goal` until the determiner resolves it.
    ///
    /// Never fails: errors become a failed outcome.
    #[instrument(skip_all, fields(goal_id = %goal.id))]
    pub async fn handle_goal(&mut self, goal: Goal) -> PursuitOutcome {
        self.channel
            .info(&format!("Starting handle goal: {goal}"))
            .await;
        let mut progress = PursuitProgress::new(goal);

        match self.pursue(&mut progress).await {
            Ok(resolution) => {
                self.channel
                    .info(&format!("Goal pursuit resolved: {}", resolution.reason))
                    .await;
                info!(
                    status = resolution.status.as_str(),
                    steps = progress.step_count(),
                    "Goal pursuit resolved"
                );
                PursuitOutcome::resolved(progress, resolution)
            }
            Err(e) => {
                let message = format!("Goal pursuit failed with error: {e}");
                self.channel.error(&message).await;
                error!(error = %e, steps = progress.step_count(), "Error during goal pursuit");
                PursuitOutcome::resolved(
                    progress,
                    Resolution::new("Pursuit failed", message, ResolutionStatus::Failed),
                )
            }
        }
    }

    async fn pursue(&mut self, progress: &mut PursuitProgress) -> DomainResult<Resolution> {
        progress
            .goal
            .validate()
            .map_err(DomainError::ValidationFailed)?;

        loop {
            if let Some(max_steps) = self.max_steps {
                if progress.step_count() >= max_steps {
                    warn!(max_steps, "Step limit reached");
                    return Ok(Resolution::new(
                        "Step limit reached",
                        format!("Stopped after {max_steps} steps without resolving the goal."),
                        ResolutionStatus::Abandoned,
                    ));
                }
            }

            let directive = self
                .determiner
                .determine_action(&self.beliefs, progress, &self.tools, self.channel.as_ref())
                .await?;

            let plan = match directive {
                Directive::Resolution(resolution) => return Ok(resolution),
                Directive::Operation(plan) => plan,
            };
            self.channel
                .info(&format!("Executing: {}", plan.reason))
                .await;

            let outcome = self.execute_tool(plan).await;
            if outcome.is_success() {
                self.channel
                    .info(&format!("✓ Completed: {}", outcome.operation.reason))
                    .await;
            } else {
                self.channel
                    .error(&format!(
                        "✗ Failed: {} - {}",
                        outcome.operation.reason,
                        outcome.error_message.as_deref().unwrap_or_default()
                    ))
                    .await;
            }
            progress.record(outcome);
        }
    }

    async fn execute_tool(&self, plan: OperationPlan) -> StepOutcome {
        let started_at = Utc::now();
        let Some(tool) = self.tools.get(&plan.tool) else {
            warn!(tool = %plan.tool, "Tool not found");
            let message = format!("Tool {} not found", plan.tool);
            return StepOutcome::failure(plan, message, started_at);
        };

        self.channel
            .debug(&format!(
                "Calling tool {} with params: {}",
                plan.tool,
                serde_json::Value::Object(plan.parameters.clone())
            ))
            .await;

        match tool
            .call(self.channel.as_ref(), plan.parameters.clone())
            .await
        {
            Ok(ToolOutput::Result { result }) => StepOutcome::success(plan, result, started_at),
            Ok(ToolOutput::Error { message }) => StepOutcome::failure(plan, message, started_at),
            Err(e) => {
                error!(tool = %plan.tool, error = %e, "Error executing tool");
                let message = format!("{e:#}");
                StepOutcome::failure(plan, message, started_at)
            }
        }
    }

    pub fn into_request_handler(self, translator: Arc<dyn GoalTranslator>) -> RequestHandler<D> {
        RequestHandler {
            executor: self,
            translator,
        }
    }

    pub fn into_autonomous_agent(self, decider: Arc<dyn GoalDecider>) -> AutonomousAgent<D> {
        AutonomousAgent {
            executor: self,
            decider,
        }
    }
}

/// Translates requests into goals and answers with the outcome's response.
pub struct RequestHandler<D> {
    executor: GoalExecutor<D>,
    translator: Arc<dyn GoalTranslator>,
}

impl<D: ActionDeterminer> RequestHandler<D> {
    pub fn executor(&self) -> &GoalExecutor<D> {
        &self.executor
    }

    pub async fn handle_request(&mut self, request: &str) -> DomainResult<String> {
        let goal = self
            .translator
            .translate(request, &self.executor.beliefs)
            .await?;
        let outcome = self.executor.handle_goal(goal).await;
        Ok(outcome.response)
    }
}

/// Chooses its own goals and pursues them one at a time.
pub struct AutonomousAgent<D> {
    executor: GoalExecutor<D>,
    decider: Arc<dyn GoalDecider>,
}

impl<D: ActionDeterminer> AutonomousAgent<D> {
    pub fn executor(&self) -> &GoalExecutor<D> {
        &self.executor
    }

    /// Decide on the next goal and pursue it. `None` when there is nothing to do.
    pub async fn pursue_next_goal(&mut self) -> DomainResult<Option<PursuitOutcome>> {
        let Some(goal) = self.decider.next_goal(&self.executor.beliefs).await? else {
            self.executor.channel.info("No new goals to pursue.").await;
            return Ok(None);
        };
        self.executor
            .channel
            .info(&format!(
                "Decided to pursue new goal: {}",
                goal.description
            ))
            .await;
        Ok(Some(self.executor.handle_goal(goal).await))
    }
}
