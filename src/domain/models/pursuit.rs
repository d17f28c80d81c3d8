//! Pursuit domain model.
//!
//! A pursuit is the lifecycle of working one goal to a terminal resolution.
//! [`PursuitProgress`] is the append-only history every phase reads;
//! [`PursuitAssessment`] is the compact summary the assessor derives from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::goal::Goal;
use super::step::{Resolution, ResolutionStatus, StepOutcome};

/// Progress of one pursuit: the goal plus every executed step, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuitProgress {
    pub goal: Goal,
    #[serde(default)]
    pub executed_steps: Vec<StepOutcome>,
}

impl PursuitProgress {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            executed_steps: Vec::new(),
        }
    }

    /// Append an executed step. Only the goal executor calls this.
    pub fn record(&mut self, outcome: StepOutcome) {
        self.executed_steps.push(outcome);
    }

    pub fn step_count(&self) -> usize {
        self.executed_steps.len()
    }
}

impl fmt::Display for PursuitProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.goal)?;
        if !self.executed_steps.is_empty() {
            write!(f, "\nExecuted Steps:")?;
            for (i, outcome) in self.executed_steps.iter().enumerate() {
                let symbol = if outcome.is_success() { '✓' } else { '✗' };
                write!(
                    f,
                    "\n  {}. {} [{}] {}",
                    i + 1,
                    symbol,
                    outcome.operation.tool,
                    outcome.summary()
                )?;
            }
        }
        Ok(())
    }
}

/// Structured summary of what is done, what is left and what would succeed.
///
/// Refinement replaces an assessment wholesale; it is never patched field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PursuitAssessment {
    /// Tasks already completed toward the goal
    pub finished_tasks: Vec<String>,
    /// What still needs to be done
    pub remaining_work_summary: String,
    /// Context still needed to complete the goal
    pub required_context: String,
    /// Actions expected to complete the goal
    pub expected_actions: String,
    /// Constraints for the remaining work
    pub boundary_conditions: Vec<String>,
    /// Edge cases or error conditions to handle
    pub exception_conditions: Vec<String>,
    /// Conditions indicating the goal is achieved
    pub success_criteria: Vec<String>,
}

/// Final status of a pursuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuitStatus {
    Completed,
    Failed,
    Abandoned,
}

impl PursuitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl From<ResolutionStatus> for PursuitStatus {
    fn from(status: ResolutionStatus) -> Self {
        match status {
            ResolutionStatus::Success => Self::Completed,
            ResolutionStatus::Failed => Self::Failed,
            ResolutionStatus::Abandoned => Self::Abandoned,
        }
    }
}

/// Final outcome of a pursuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuitOutcome {
    pub goal: Goal,
    /// Why the pursuit ended
    pub reason: String,
    /// User-facing completion message
    pub response: String,
    pub status: PursuitStatus,
    pub executed_steps: Vec<StepOutcome>,
    pub resolution: Resolution,
    pub resolved_at: DateTime<Utc>,
}

impl PursuitOutcome {
    /// Build the outcome for a pursuit that ended with `resolution`.
    pub fn resolved(progress: PursuitProgress, resolution: Resolution) -> Self {
        Self {
            goal: progress.goal,
            reason: resolution.reason.clone(),
            response: resolution.response.clone(),
            status: resolution.status.into(),
            executed_steps: progress.executed_steps,
            resolution,
            resolved_at: Utc::now(),
        }
    }

    /// Produce a multi-line, prompt-ready summary of this outcome.
    pub fn summarize(&self, max_result_len: usize, max_response_len: usize) -> String {
        let mut parts = vec![format!(
            "  → Goal: {} | Status: {} | Steps: {}",
            self.goal.description,
            self.status.as_str(),
            self.executed_steps.len()
        )];
        if self.status != PursuitStatus::Completed && !self.reason.is_empty() {
            parts.push(format!("  → Reason: {}", self.reason));
        }
        if !self.executed_steps.is_empty() {
            parts.push("  Steps:".to_string());
            for (i, step) in self.executed_steps.iter().enumerate() {
                let symbol = if step.is_success() { '✓' } else { '✗' };
                parts.push(format!(
                    "    {}. {} [{}] {}",
                    i + 1,
                    symbol,
                    step.operation.tool,
                    step.operation.reason
                ));
                parts.push(format!(
                    "       Result: {}",
                    truncate(step.summary(), max_result_len)
                ));
            }
        }
        if !self.response.is_empty() {
            parts.push(format!(
                "  → Response: {}",
                truncate(&self.response, max_response_len)
            ));
        }
        parts.join("\n")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
