pub mod config;
pub mod decision;
pub mod goal;
pub mod plan;
pub mod pursuit;
pub mod resource;
pub mod step;
pub mod workspace;

pub use config::{Config, DecisionConfig, LoggingConfig, WorkspaceConfig};
pub use decision::{
    ActionDecision, Approval, Choice, DecisionKind, DecodeError, ExecutionDetail,
    FinalizationDetail, Judgment, RefinementVerdict, VerdictKind,
};
pub use goal::{Goal, GoalSource};
pub use plan::{DiscoveryPlan, FieldExclusion, RefinementPlan};
pub use pursuit::{PursuitAssessment, PursuitOutcome, PursuitProgress, PursuitStatus};
pub use resource::{child_location, ResolvedResource, ResourceRecord, SearchMatch};
pub use step::{Directive, OperationPlan, Resolution, ResolutionStatus, StepOutcome, StepStatus};
pub use workspace::{
    ContextWorkspace, ResourceSegment, SearchRecord, SegmentView, WorkspaceSnapshot,
};
