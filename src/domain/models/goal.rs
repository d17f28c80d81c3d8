//! Goal domain model.
//!
//! A goal is the natural-language objective driving one pursuit. Goals are
//! immutable once created: the pursuit owns its goal and only ever appends
//! step outcomes next to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a goal came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalSource {
    /// Goal translated from a user request.
    UserRequest {
        /// The raw request text
        request: String,
    },
    /// Goal chosen autonomously by a goal decider.
    Autonomous {
        /// Name of the decider that produced the goal
        decider: String,
        /// Optional free-form context the decider attached
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
}

impl GoalSource {
    pub fn user_request(request: impl Into<String>) -> Self {
        Self::UserRequest {
            request: request.into(),
        }
    }

    pub fn autonomous(decider: impl Into<String>, context: Option<String>) -> Self {
        Self::Autonomous {
            decider: decider.into(),
            context,
        }
    }

    /// Returns true if the goal was chosen without a user request.
    pub fn is_autonomous(&self) -> bool {
        matches!(self, Self::Autonomous { .. })
    }
}

impl fmt::Display for GoalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserRequest { request } => write!(f, "UserRequest({request})"),
            Self::Autonomous {
                decider,
                context: Some(context),
            } => write!(f, "Autonomous[{decider}]({context})"),
            Self::Autonomous {
                decider,
                context: None,
            } => write!(f, "Autonomous[{decider}]"),
        }
    }
}

/// A clear and concise objective for one pursuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: Uuid,
    /// What the pursuit should achieve
    pub description: String,
    /// Provenance of the goal
    pub source: GoalSource,
    /// When this goal was created
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with the given description and source.
    pub fn new(description: impl Into<String>, source: GoalSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            source,
            created_at: Utc::now(),
        }
    }

    /// Create a goal that originated from a user request.
    pub fn from_request(description: impl Into<String>, request: impl Into<String>) -> Self {
        Self::new(description, GoalSource::user_request(request))
    }

    /// Validate this goal.
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Goal description cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Goal: {}\nSource Request: {}", self.description, self.source)
    }
}
