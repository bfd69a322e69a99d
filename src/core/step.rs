//! Step domain model and the fixed pipeline topology

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of pipeline steps.
///
/// The execution order is defined by [`TOPOLOGY`], not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Download,
    BasicCleaning,
    DataCheck,
    DataSplit,
    TrainRandomForest,
    TestRegressionModel,
}

/// Fixed execution order of the pipeline.
///
/// Later steps consume artifacts produced by earlier ones, so this order is
/// part of the pipeline contract. `test_regression_model` is declared but
/// disabled (see [`StepName::strategy`]).
pub const TOPOLOGY: [StepName; 6] = [
    StepName::Download,
    StepName::BasicCleaning,
    StepName::DataCheck,
    StepName::DataSplit,
    StepName::TrainRandomForest,
    StepName::TestRegressionModel,
];

/// How a topology entry is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Dispatch the step's executable unit and wait for it to exit.
    Dispatch,
    /// Declared in the topology but intentionally a no-op today.
    NotImplemented,
}

impl StepName {
    /// Parse a directive token into a step name.
    pub fn parse(token: &str) -> Option<StepName> {
        match token {
            "download" => Some(StepName::Download),
            "basic_cleaning" => Some(StepName::BasicCleaning),
            "data_check" => Some(StepName::DataCheck),
            "data_split" => Some(StepName::DataSplit),
            "train_random_forest" => Some(StepName::TrainRandomForest),
            "test_regression_model" => Some(StepName::TestRegressionModel),
            _ => None,
        }
    }

    /// The wire name of this step, as it appears in the steps directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Download => "download",
            StepName::BasicCleaning => "basic_cleaning",
            StepName::DataCheck => "data_check",
            StepName::DataSplit => "data_split",
            StepName::TrainRandomForest => "train_random_forest",
            StepName::TestRegressionModel => "test_regression_model",
        }
    }

    /// Execution strategy for this step.
    ///
    /// `data_check` and `test_regression_model` are deliberate no-ops: they
    /// keep their topology slot so enabling them later does not reorder the
    /// pipeline.
    pub fn strategy(&self) -> ExecutionStrategy {
        match self {
            StepName::DataCheck | StepName::TestRegressionModel => {
                ExecutionStrategy::NotImplemented
            }
            _ => ExecutionStrategy::Dispatch,
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Isolation strategy for a step's executable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationMode {
    /// Reproducible conda environment per step.
    Conda,
    /// Run in the launcher's own environment.
    None,
}

impl IsolationMode {
    /// Value passed to the launcher's `--env-manager` flag.
    pub fn env_manager(&self) -> &'static str {
        match self {
            IsolationMode::Conda => "conda",
            IsolationMode::None => "local",
        }
    }
}

/// A parameter value passed to a step's executable unit.
///
/// Steps only ever see strings on the wire; this keeps the config-level
/// distinction so numbers render unquoted.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl ParamValue {
    pub fn str(s: impl Into<String>) -> Self {
        ParamValue::Str(s.into())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Declarative description of one dispatchable pipeline stage.
///
/// Immutable for the duration of a run; built from resolved configuration
/// just before dispatch.
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Which topology entry this spec belongs to.
    pub id: StepName,

    /// Executable unit reference: a local path or a repository locator.
    pub executable_ref: String,

    /// Entry point inside the executable unit.
    pub entry_point: String,

    /// Isolation requirement for the child execution.
    pub isolation: IsolationMode,

    /// Resolved parameter bindings, in stable order.
    pub parameters: BTreeMap<String, ParamValue>,
}

impl StepSpec {
    pub fn new(id: StepName, executable_ref: impl Into<String>) -> Self {
        Self {
            id,
            executable_ref: executable_ref.into(),
            entry_point: "main".to_string(),
            isolation: IsolationMode::Conda,
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter binding.
    pub fn param(mut self, key: &str, value: ParamValue) -> Self {
        self.parameters.insert(key.to_string(), value);
        self
    }
}
