//! Common test utilities for integration tests
//!
//! Deterministic stand-ins for every decision phase, a few tools and a
//! channel that records what it was told. Each stub counts its calls so
//! tests can assert on how the loops drove them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use reckon::adapters::InMemoryResourceRepository;
use reckon::domain::errors::{DomainError, DomainResult};
use reckon::domain::models::{
    ActionDecision, DecisionConfig, DiscoveryPlan, ExecutionDetail, FinalizationDetail,
    PursuitAssessment, PursuitProgress, RefinementPlan, RefinementVerdict, ResolutionStatus,
};
use reckon::domain::ports::{
    ActionDecider, AnalysisInput, ContextAnalyser, ContextDiscoverer, DecisionInput,
    DiscoveryInput, ExecutionChannel, ParameterKind, PursuitAssessor, RefinementAnalyzer, Tool,
    ToolOutput, ToolParameter, VerdictInput,
};
use reckon::services::{ActionDetermineLoop, DecisionPhases, ResourceContext};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Small resource tree shared by the loop and repository tests.
pub const STORY_TREE: &str = r"
aspects:
  - name: character
    fields: { description: People in the story }
    elements:
      - id: alice
        fields: { name: Alice, role: brave knight }
        relations: { /character/bob: [sister of] }
        children:
          notes:
            - id: diary
              fields: { tone: secretive }
      - id: bob
        fields: { name: Bob, role: cowardly squire }
        relations: { /character/alice: [brother of] }
  - name: place
    fields: { description: Where the story happens }
    elements:
      - id: castle
        fields: { name: Castle Black, mood: grim knight hall }
";

pub fn story_repository() -> Arc<InMemoryResourceRepository> {
    Arc::new(InMemoryResourceRepository::from_yaml_str(STORY_TREE).expect("fixture tree parses"))
}

pub fn story_context() -> ResourceContext {
    ResourceContext::with_defaults(story_repository())
}

pub fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

pub fn execute_decision(tool: &str) -> ActionDecision {
    ActionDecision::execute(
        format!("run {tool}"),
        ExecutionDetail::new(tool, params(&[("input", Value::from("x"))])),
    )
}

pub fn finalize_decision(status: ResolutionStatus, response: &str) -> ActionDecision {
    ActionDecision::finalize("done", FinalizationDetail::new(status, response))
}

// --- Phases ---------------------------------------------------------------

#[derive(Default)]
pub struct CountingAssessor {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PursuitAssessor for CountingAssessor {
    async fn assess(
        &self,
        progress: &PursuitProgress,
        _beliefs: &[String],
    ) -> DomainResult<PursuitAssessment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PursuitAssessment {
            finished_tasks: progress
                .executed_steps
                .iter()
                .map(|step| step.operation.reason.clone())
                .collect(),
            remaining_work_summary: format!("Work on: {}", progress.goal.description),
            ..Default::default()
        })
    }
}

/// Replays a fixed list of plans, then settles.
#[derive(Default)]
pub struct ScriptedDiscoverer {
    plans: Mutex<Vec<DiscoveryPlan>>,
    pub calls: AtomicUsize,
    pub seen_history_lengths: Mutex<Vec<usize>>,
}

impl ScriptedDiscoverer {
    pub fn settled() -> Self {
        Self::default()
    }

    pub fn with_plans(plans: Vec<DiscoveryPlan>) -> Self {
        let mut plans = plans;
        plans.reverse();
        Self {
            plans: Mutex::new(plans),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContextDiscoverer for ScriptedDiscoverer {
    async fn discover(&self, input: DiscoveryInput<'_>) -> DomainResult<DiscoveryPlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_history_lengths
            .lock()
            .unwrap()
            .push(input.search_history.len());
        Ok(self
            .plans
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| DiscoveryPlan::settled("context is sufficient")))
    }
}

/// Always asks for one more resource.
#[derive(Default)]
pub struct GreedyDiscoverer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContextDiscoverer for GreedyDiscoverer {
    async fn discover(&self, _input: DiscoveryInput<'_>) -> DomainResult<DiscoveryPlan> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DiscoveryPlan {
            discovery_analysis: "need more".to_string(),
            query_resources: vec![format!("/wanted/{n}")],
            ..Default::default()
        })
    }
}

#[derive(Default)]
pub struct FixedAnalyser {
    plan: RefinementPlan,
    pub calls: AtomicUsize,
}

impl FixedAnalyser {
    pub fn new(plan: RefinementPlan) -> Self {
        Self {
            plan,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContextAnalyser for FixedAnalyser {
    async fn analyse(&self, _input: AnalysisInput<'_>) -> DomainResult<RefinementPlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.plan.clone())
    }
}

type DecisionScript = Box<dyn Fn(usize) -> ActionDecision + Send + Sync>;

/// Produces the decision for the n-th call (0-based).
pub struct ScriptedDecider {
    script: DecisionScript,
    pub calls: AtomicUsize,
    pub seen_expanded_tools: Mutex<Vec<Vec<String>>>,
}

impl ScriptedDecider {
    pub fn new(script: impl Fn(usize) -> ActionDecision + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            seen_expanded_tools: Mutex::new(Vec::new()),
        }
    }

    pub fn always(decision: ActionDecision) -> Self {
        Self::new(move |_| decision.clone())
    }
}

#[async_trait]
impl ActionDecider for ScriptedDecider {
    async fn decide(&self, input: DecisionInput<'_>) -> DomainResult<ActionDecision> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_expanded_tools
            .lock()
            .unwrap()
            .push(input.expanded_tools.names().map(ToString::to_string).collect());
        Ok((self.script)(n))
    }
}

/// A decider whose backend is down.
pub struct BrokenDecider;

#[async_trait]
impl ActionDecider for BrokenDecider {
    async fn decide(&self, _input: DecisionInput<'_>) -> DomainResult<ActionDecision> {
        Err(DomainError::phase("decide", "inference backend unavailable"))
    }
}

type VerdictScript = Box<dyn Fn(usize) -> RefinementVerdict + Send + Sync>;

/// Produces the verdict for the n-th call (0-based).
pub struct ScriptedRefiner {
    script: VerdictScript,
    pub calls: AtomicUsize,
}

impl ScriptedRefiner {
    pub fn new(script: impl Fn(usize) -> RefinementVerdict + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn approving() -> Self {
        Self::new(|_| RefinementVerdict::approve("looks right"))
    }

    pub fn refining() -> Self {
        Self::new(|n| {
            RefinementVerdict::refine(
                "not yet",
                PursuitAssessment {
                    remaining_work_summary: format!("revision {n}"),
                    ..Default::default()
                },
            )
        })
    }
}

#[async_trait]
impl RefinementAnalyzer for ScriptedRefiner {
    async fn analyze(&self, _input: VerdictInput<'_>) -> DomainResult<RefinementVerdict> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.script)(n))
    }
}

/// Shared handles to the stubs a loop was built from.
pub struct Harness {
    pub assessor: Arc<CountingAssessor>,
    pub discoverer: Arc<dyn ContextDiscoverer>,
    pub analyser: Arc<FixedAnalyser>,
    pub decider: Arc<dyn ActionDecider>,
    pub refiner: Arc<ScriptedRefiner>,
}

impl Harness {
    pub fn new(
        discoverer: Arc<dyn ContextDiscoverer>,
        decider: Arc<dyn ActionDecider>,
        refiner: Arc<ScriptedRefiner>,
    ) -> Self {
        Self {
            assessor: Arc::new(CountingAssessor::default()),
            discoverer,
            analyser: Arc::new(FixedAnalyser::default()),
            decider,
            refiner,
        }
    }

    pub fn with_analyser(mut self, analyser: Arc<FixedAnalyser>) -> Self {
        self.analyser = analyser;
        self
    }

    pub fn phases(&self) -> DecisionPhases {
        DecisionPhases {
            assessor: self.assessor.clone(),
            discoverer: self.discoverer.clone(),
            analyser: self.analyser.clone(),
            decider: self.decider.clone(),
            refiner: self.refiner.clone(),
        }
    }

    pub fn build_loop(&self, max_iterations: Option<u32>, min_iterations: u32) -> ActionDetermineLoop {
        let config = DecisionConfig {
            max_iterations,
            min_iterations,
            max_steps: None,
        };
        ActionDetermineLoop::new(story_context(), self.phases(), &config)
    }
}

// --- Tools ----------------------------------------------------------------

/// Echoes its `input` parameter back.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the input back"
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::required(
            "input",
            ParameterKind::String,
            "Text to echo",
        )]
    }

    async fn call(
        &self,
        channel: &dyn ExecutionChannel,
        params: Map<String, Value>,
    ) -> anyhow::Result<ToolOutput> {
        let input = params
            .get("input")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        channel.output(&input).await;
        Ok(ToolOutput::result(format!("echo: {input}")))
    }
}

/// Reports a tool-level error without faulting.
pub struct RefusingTool;

#[async_trait]
impl Tool for RefusingTool {
    fn name(&self) -> &str {
        "refuse"
    }

    fn description(&self) -> &str {
        "Always declines"
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        Vec::new()
    }

    async fn call(
        &self,
        _channel: &dyn ExecutionChannel,
        _params: Map<String, Value>,
    ) -> anyhow::Result<ToolOutput> {
        Ok(ToolOutput::error("permission denied"))
    }
}

/// Faults on every call.
pub struct FaultyTool;

#[async_trait]
impl Tool for FaultyTool {
    fn name(&self) -> &str {
        "faulty"
    }

    fn description(&self) -> &str {
        "Always faults"
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        Vec::new()
    }

    async fn call(
        &self,
        _channel: &dyn ExecutionChannel,
        _params: Map<String, Value>,
    ) -> anyhow::Result<ToolOutput> {
        Err(anyhow::anyhow!("disk on fire").context("faulty tool crashed"))
    }
}

// --- Channel --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Output,
}

/// Remembers every message it receives.
#[derive(Default)]
pub struct RecordingChannel {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingChannel {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.messages.lock().unwrap().push((level, message.to_string()));
    }
}

#[async_trait]
impl ExecutionChannel for RecordingChannel {
    async fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    async fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    async fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    async fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    async fn output(&self, message: &str) {
        self.push(Level::Output, message);
    }

    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }

    async fn request(&self, _prompt: &str) -> String {
        String::new()
    }
}
