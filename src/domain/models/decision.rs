//! Action decisions and refinement verdicts.
//!
//! Both arrive from pluggable phases in a flat wire shape: a kind tag plus
//! one optional payload per variant. They are decoded into the tagged
//! [`Choice`] and [`Judgment`] before the loop acts on them. A payload that
//! does not match its tag, or that lacks one of its fields, is a
//! [`DecodeError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pursuit::PursuitAssessment;
use super::step::{Directive, OperationPlan, Resolution, ResolutionStatus};

/// Malformed phase output.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{kind} decision is missing its {payload} payload")]
    MissingPayload {
        kind: &'static str,
        payload: &'static str,
    },

    #[error("execute decision names no tool")]
    EmptyTool,

    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Execute,
    Finalize,
}

/// Tool invocation requested by an execute decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionDetail {
    pub tool: String,
    pub params: serde_json::Map<String, serde_json::Value>,
    /// high, medium or low
    pub confidence: String,
    pub reasoning: String,
}

impl ExecutionDetail {
    pub fn new(tool: impl Into<String>, params: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            tool: tool.into(),
            params,
            confidence: "medium".to_string(),
            reasoning: String::new(),
        }
    }
}

/// Terminal response requested by a finalize decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinalizationDetail {
    pub status: ResolutionStatus,
    pub response: String,
    /// Segments supporting the response
    pub evidence: Vec<String>,
    /// Missing information, for abandoned pursuits
    pub gaps: Vec<String>,
}

impl FinalizationDetail {
    pub fn new(status: ResolutionStatus, response: impl Into<String>) -> Self {
        Self {
            status,
            response: response.into(),
            evidence: Vec::new(),
            gaps: Vec::new(),
        }
    }
}

/// Execute-vs-finalize choice in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDecision {
    pub situation_analysis: String,
    pub decision_type: DecisionKind,
    #[serde(default)]
    pub execution: Option<ExecutionDetail>,
    #[serde(default)]
    pub finalization: Option<FinalizationDetail>,
    /// Prerequisite and parameter checks against the context
    #[serde(default)]
    pub context_verification: serde_json::Map<String, serde_json::Value>,
}

/// A decoded [`ActionDecision`].
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Execute(ExecutionDetail),
    Finalize(FinalizationDetail),
}

impl ActionDecision {
    pub fn execute(analysis: impl Into<String>, detail: ExecutionDetail) -> Self {
        Self {
            situation_analysis: analysis.into(),
            decision_type: DecisionKind::Execute,
            execution: Some(detail),
            finalization: None,
            context_verification: serde_json::Map::new(),
        }
    }

    pub fn finalize(analysis: impl Into<String>, detail: FinalizationDetail) -> Self {
        Self {
            situation_analysis: analysis.into(),
            decision_type: DecisionKind::Finalize,
            execution: None,
            finalization: Some(detail),
            context_verification: serde_json::Map::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decode the tagged choice, rejecting a tag without its payload.
    pub fn choice(&self) -> Result<Choice, DecodeError> {
        match self.decision_type {
            DecisionKind::Execute => {
                let detail = self.execution.clone().ok_or(DecodeError::MissingPayload {
                    kind: "execute",
                    payload: "execution",
                })?;
                if detail.tool.trim().is_empty() {
                    return Err(DecodeError::EmptyTool);
                }
                Ok(Choice::Execute(detail))
            }
            DecisionKind::Finalize => self
                .finalization
                .clone()
                .map(Choice::Finalize)
                .ok_or(DecodeError::MissingPayload {
                    kind: "finalize",
                    payload: "finalization",
                }),
        }
    }

    /// Convert into the directive handed to the goal executor.
    ///
    /// A malformed decision becomes a failed resolution.
    pub fn to_directive(&self) -> Directive {
        match self.choice() {
            Ok(Choice::Execute(detail)) => Directive::Operation(OperationPlan::new(
                self.situation_analysis.clone(),
                detail.tool,
                detail.params,
            )),
            Ok(Choice::Finalize(detail)) => Directive::Resolution(Resolution::new(
                self.situation_analysis.clone(),
                detail.response,
                detail.status,
            )),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed action decision");
                Directive::Resolution(Resolution::invalid_decision())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Approve,
    Refine,
}

/// Approval details for an approve verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Approval {
    pub ready: bool,
    /// high or medium
    pub confidence: String,
    pub notes: String,
}

/// Judgment over an action decision in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinementVerdict {
    pub analysis: String,
    pub verdict: VerdictKind,
    #[serde(default)]
    pub approval: Option<Approval>,
    #[serde(default)]
    pub refinement: Option<PursuitAssessment>,
}

/// A decoded [`RefinementVerdict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    Approve(Approval),
    /// Replace the assessment wholesale and try again
    Refine(PursuitAssessment),
}

impl RefinementVerdict {
    pub fn approve(analysis: impl Into<String>) -> Self {
        Self {
            analysis: analysis.into(),
            verdict: VerdictKind::Approve,
            approval: Some(Approval {
                ready: true,
                confidence: "high".to_string(),
                notes: String::new(),
            }),
            refinement: None,
        }
    }

    pub fn refine(analysis: impl Into<String>, assessment: PursuitAssessment) -> Self {
        Self {
            analysis: analysis.into(),
            verdict: VerdictKind::Refine,
            approval: None,
            refinement: Some(assessment),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn judgment(&self) -> Result<Judgment, DecodeError> {
        match self.verdict {
            VerdictKind::Approve => self
                .approval
                .clone()
                .map(Judgment::Approve)
                .ok_or(DecodeError::MissingPayload {
                    kind: "approve",
                    payload: "approval",
                }),
            VerdictKind::Refine => self
                .refinement
                .clone()
                .map(Judgment::Refine)
                .ok_or(DecodeError::MissingPayload {
                    kind: "refine",
                    payload: "refinement",
                }),
        }
    }
}
