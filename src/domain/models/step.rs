//! Step domain model.
//!
//! The decision engine produces exactly one [`Directive`] per invocation:
//! either an [`OperationPlan`] naming a tool to run, or a [`Resolution`]
//! that ends the pursuit. Executed plans come back as [`StepOutcome`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status carried by a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// The goal was achieved
    Success,
    /// The goal cannot be achieved
    Failed,
    /// The pursuit stopped without achieving the goal
    #[serde(alias = "incomplete")]
    Abandoned,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "abandoned" | "incomplete" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

/// Request to run one tool with the given parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    /// Why this operation advances the goal
    pub reason: String,
    /// Name of the tool to invoke
    pub tool: String,
    /// Parameters passed to the tool
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl OperationPlan {
    pub fn new(
        reason: impl Into<String>,
        tool: impl Into<String>,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            reason: reason.into(),
            tool: tool.into(),
            parameters,
        }
    }
}

/// Decision to stop pursuing the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Why the pursuit ends
    pub reason: String,
    /// User-facing response
    pub response: String,
    /// Terminal status
    pub status: ResolutionStatus,
}

impl Resolution {
    pub fn new(
        reason: impl Into<String>,
        response: impl Into<String>,
        status: ResolutionStatus,
    ) -> Self {
        Self {
            reason: reason.into(),
            response: response.into(),
            status,
        }
    }

    /// Resolution produced when a phase returned a payload that cannot be decoded.
    pub fn invalid_decision() -> Self {
        Self::new(
            "Invalid action decision",
            "Unable to process the action decision.",
            ResolutionStatus::Failed,
        )
    }

    /// Resolution returned when the iteration budget ran out before any decision.
    pub fn budget_exhausted() -> Self {
        Self::new(
            "Maximum iterations reached without achieving goal",
            "I was unable to complete your request within the iteration limit.",
            ResolutionStatus::Abandoned,
        )
    }
}

/// The only output of the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// Run a tool
    Operation(OperationPlan),
    /// Stop the pursuit
    Resolution(Resolution),
}

impl Directive {
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Operation(plan) => &plan.reason,
            Self::Resolution(resolution) => &resolution.reason,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(plan) => write!(f, "execute {} ({})", plan.tool, plan.reason),
            Self::Resolution(resolution) => write!(
                f,
                "finalize as {} ({})",
                resolution.status.as_str(),
                resolution.reason
            ),
        }
    }
}

impl From<OperationPlan> for Directive {
    fn from(plan: OperationPlan) -> Self {
        Self::Operation(plan)
    }
}

impl From<Resolution> for Directive {
    fn from(resolution: Resolution) -> Self {
        Self::Resolution(resolution)
    }
}

/// Status of an executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failed,
    Cancelled,
}

/// Result of executing one [`OperationPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The plan that was executed
    pub operation: OperationPlan,
    /// Outcome status
    pub status: StepStatus,
    /// Results produced by the tool
    #[serde(default)]
    pub results: Vec<String>,
    /// Error message when the step failed
    pub error_message: Option<String>,
    /// When execution started
    pub started_at: DateTime<Utc>,
    /// When execution finished
    pub completed_at: DateTime<Utc>,
}

impl StepOutcome {
    pub fn success(operation: OperationPlan, result: String, started_at: DateTime<Utc>) -> Self {
        Self {
            operation,
            status: StepStatus::Success,
            results: vec![result],
            error_message: None,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn failure(
        operation: OperationPlan,
        error: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            operation,
            status: StepStatus::Failed,
            results: Vec::new(),
            error_message: Some(error.into()),
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }

    /// First result, or the error message, or a placeholder.
    pub fn summary(&self) -> &str {
        self.results
            .first()
            .map(String::as_str)
            .or(self.error_message.as_deref())
            .unwrap_or("No result")
    }
}
