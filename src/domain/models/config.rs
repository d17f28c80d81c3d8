use serde::{Deserialize, Serialize};

/// Main configuration structure for reckon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Iteration budgets for the decision engine
    #[serde(default)]
    pub decision: DecisionConfig,

    /// Context workspace configuration
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Beliefs and constraints handed to every phase
    #[serde(default)]
    pub beliefs: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Iteration budgets for one `determine_action` call and one pursuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DecisionConfig {
    /// Shared budget for discovery rounds and decision rounds; `None` is unbounded
    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<u32>,

    /// Rounds that must pass before an approved tool invocation is returned
    #[serde(default)]
    pub min_iterations: u32,

    /// Cap on executed steps per pursuit; `None` is unlimited
    #[serde(default)]
    pub max_steps: Option<usize>,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_iterations() -> Option<u32> {
    Some(5)
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            min_iterations: 0,
            max_steps: None,
        }
    }
}

/// Context workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkspaceConfig {
    /// Location admitted when a workspace is created
    #[serde(default = "default_root_location")]
    pub root_location: String,

    /// Maximum matches admitted per search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Number of recent searches shown to the discovery phase
    #[serde(default = "default_search_history_window")]
    pub search_history_window: usize,
}

fn default_root_location() -> String {
    "/".to_string()
}

const fn default_search_limit() -> usize {
    5
}

const fn default_search_history_window() -> usize {
    10
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root_location: default_root_location(),
            search_limit: default_search_limit(),
            search_history_window: default_search_history_window(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
