//! Test helpers shared by integration tests

use async_trait::async_trait;
use mlpipe::{DispatchError, PipelineConfig, RunContext, StepDispatcher, StepName, StepSpec};
use std::sync::{Arc, Mutex};

/// Config fixture mirroring the training project's config file.
pub const SAMPLE_YAML: &str = r#"
main:
  project_name: "nyc_airbnb"
  experiment_name: "development"
  steps: "all"
  components_repository: "https://github.com/example/components"
etl:
  sample: "sample1.csv"
  min_price: 10
  max_price: 350
modeling:
  test_size: 0.2
  val_size: 0.2
  random_seed: 42
  stratify_by: "neighbourhood_group"
  max_tfidf_features: 5
  random_forest:
    n_estimators: 100
    max_depth: 15
    min_samples_split: 4
"#;

/// One recorded dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub spec: StepSpec,
    pub ctx: RunContext,
    /// Contents of the file bound to `rf_config` at the moment of dispatch,
    /// if the parameter was present and readable.
    pub rf_config_contents: Option<String>,
}

/// Dispatcher fake that records every call in order and can be told to
/// fail on a specific step.
pub struct RecordingDispatcher {
    calls: Arc<Mutex<Vec<DispatchCall>>>,
    fail_on: Option<StepName>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    pub fn failing_on(step: StepName) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.fail_on = Some(step);
        dispatcher
    }

    /// Shared handle to the ordered call log.
    pub fn calls(&self) -> Arc<Mutex<Vec<DispatchCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl StepDispatcher for RecordingDispatcher {
    async fn dispatch(&self, spec: &StepSpec, ctx: &RunContext) -> Result<(), DispatchError> {
        let rf_config_contents = match spec.parameters.get("rf_config") {
            Some(value) => std::fs::read_to_string(value.to_string()).ok(),
            None => None,
        };

        self.calls.lock().unwrap().push(DispatchCall {
            spec: spec.clone(),
            ctx: ctx.clone(),
            rf_config_contents,
        });

        if self.fail_on == Some(spec.id) {
            return Err(DispatchError::NonZeroExit {
                code: 1,
                stderr: format!("{} blew up", spec.id),
            });
        }

        Ok(())
    }
}

/// Sample config with the steps directive replaced.
pub fn config_with_steps(directive: &str) -> PipelineConfig {
    let yaml = SAMPLE_YAML.replace(r#"steps: "all""#, &format!(r#"steps: "{}""#, directive));
    PipelineConfig::from_yaml(&yaml).expect("sample config should parse")
}

/// Step ids of the recorded calls, in dispatch order.
pub fn dispatched_steps(calls: &Arc<Mutex<Vec<DispatchCall>>>) -> Vec<StepName> {
    calls.lock().unwrap().iter().map(|c| c.spec.id).collect()
}
