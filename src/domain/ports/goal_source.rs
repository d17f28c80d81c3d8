//! Goal sources: where the next goal comes from.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Goal;

/// Turns a user request into a goal.
#[async_trait]
pub trait GoalTranslator: Send + Sync {
    async fn translate(&self, request: &str, beliefs: &[String]) -> DomainResult<Goal>;
}

/// Picks the next goal to pursue without a user request.
#[async_trait]
pub trait GoalDecider: Send + Sync {
    /// Returns `None` when there is nothing left worth doing.
    async fn next_goal(&self, beliefs: &[String]) -> DomainResult<Option<Goal>>;
}
