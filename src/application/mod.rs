pub mod goal_executor;

pub use goal_executor::{AutonomousAgent, GoalExecutor, RequestHandler};
