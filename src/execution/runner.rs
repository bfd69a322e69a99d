//! Pipeline runner - iterates the topology and dispatches active steps

use crate::core::{
    config::{ConfigError, PipelineConfig},
    select_steps, ArtifactRef, ParamValue, RunContext, RunState, RunStatus, StepName, StepSpec,
    TOPOLOGY,
};
use crate::execution::{
    dispatcher::{DispatchError, StepDispatcher},
    workspace::{ScopedWorkspace, WorkspaceError},
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Name of the materialized hyperparameter file inside the workspace.
pub const RF_CONFIG_FILE: &str = "rf_config.json";

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to serialize hyperparameters: {0}")]
    Hyperparameters(#[from] serde_json::Error),

    #[error("step '{step}' failed: {source}")]
    Step {
        step: StepName,
        #[source]
        source: DispatchError,
    },
}

/// Why a topology entry was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in the active step set for this run.
    Inactive,
    /// Declared in the topology but intentionally a no-op today.
    NotImplemented,
}

/// Events that can occur during a pipeline run.
#[derive(Debug, Clone)]
pub enum RunEvent {
    PipelineStarted {
        run_id: Uuid,
        project: String,
        active_steps: usize,
    },
    StepStarted {
        step: StepName,
    },
    StepSkipped {
        step: StepName,
        reason: SkipReason,
    },
    StepCompleted {
        step: StepName,
    },
    StepFailed {
        step: StepName,
        error: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(&RunEvent) + Send + Sync>;

/// Top-level control loop for one pipeline run.
///
/// Iterates [`TOPOLOGY`] in fixed order, skips inactive and disabled
/// entries, and halts on the first failure. Strictly sequential: step K
/// never starts before step K-1 (if active) has completed successfully.
pub struct PipelineRunner<D> {
    config: PipelineConfig,
    dispatcher: D,
    state: RunState,
    handlers: Vec<EventHandler>,
}

impl<D: StepDispatcher> PipelineRunner<D> {
    pub fn new(config: PipelineConfig, dispatcher: D) -> Self {
        Self {
            config,
            dispatcher,
            state: RunState::new(),
            handlers: Vec::new(),
        }
    }

    /// Register an event handler. Handlers must be added before `run`.
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    fn emit(&self, event: RunEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Execute the run to completion or first failure.
    ///
    /// The workspace lives on this function's stack, so its files are
    /// removed on every exit path, including the error returns.
    pub async fn run(&mut self) -> Result<(), PipelineError> {
        let active = select_steps(&self.config.main.steps)?;
        let ctx = RunContext::from_config(&self.config);
        let workspace = ScopedWorkspace::acquire()?;

        self.state.start(active.len());
        info!(
            "Starting pipeline run {} for project {}",
            self.state.run_id, ctx.project
        );
        self.emit(RunEvent::PipelineStarted {
            run_id: self.state.run_id,
            project: ctx.project.clone(),
            active_steps: active.len(),
        });

        for step in TOPOLOGY {
            if !active.contains(&step) {
                self.emit(RunEvent::StepSkipped {
                    step,
                    reason: SkipReason::Inactive,
                });
                continue;
            }

            let spec = match self.plan_step(step, &workspace)? {
                Some(spec) => spec,
                None => {
                    info!("Step {} is declared but not implemented, skipping", step);
                    self.emit(RunEvent::StepSkipped {
                        step,
                        reason: SkipReason::NotImplemented,
                    });
                    continue;
                }
            };

            info!("Dispatching step {}", step);
            self.emit(RunEvent::StepStarted { step });

            match self.dispatcher.dispatch(&spec, &ctx).await {
                Ok(()) => {
                    self.state.dispatched_steps += 1;
                    self.emit(RunEvent::StepCompleted { step });
                }
                Err(source) => {
                    error!("Step {} failed: {}", step, source);
                    self.state.fail();
                    self.emit(RunEvent::StepFailed {
                        step,
                        error: source.to_string(),
                    });
                    self.emit(RunEvent::PipelineCompleted {
                        run_id: self.state.run_id,
                        status: RunStatus::Failed,
                    });
                    return Err(PipelineError::Step { step, source });
                }
            }
        }

        self.state.complete();
        info!("Pipeline run {} completed", self.state.run_id);
        self.emit(RunEvent::PipelineCompleted {
            run_id: self.state.run_id,
            status: RunStatus::Completed,
        });

        Ok(())
    }

    /// Build the spec for one topology entry, or `None` for disabled steps.
    ///
    /// The training step is the only one with a materialization side
    /// effect: its hyperparameters are written to a JSON file in the
    /// workspace and the absolute path is bound as the `rf_config`
    /// parameter.
    fn plan_step(
        &self,
        step: StepName,
        workspace: &ScopedWorkspace,
    ) -> Result<Option<StepSpec>, PipelineError> {
        let main = &self.config.main;
        let etl = &self.config.etl;
        let modeling = &self.config.modeling;

        let spec = match step {
            StepName::Download => StepSpec::new(
                step,
                format!("{}/get_data", main.components_repository),
            )
            .param("sample", ParamValue::str(&etl.sample))
            .param("artifact_name", ParamValue::str("sample.csv"))
            .param("artifact_type", ParamValue::str("raw_data"))
            .param(
                "artifact_description",
                ParamValue::str("Raw file as downloaded"),
            ),

            StepName::BasicCleaning => StepSpec::new(step, "src/basic_cleaning")
                .param(
                    "input_artifact",
                    ParamValue::str(ArtifactRef::latest("sample.csv").to_string()),
                )
                .param("output_artifact", ParamValue::str("clean_sample.csv"))
                .param("output_type", ParamValue::str("clean_sample"))
                .param(
                    "output_description",
                    ParamValue::str("Data after basic cleaning"),
                )
                .param("min_price", ParamValue::Float(etl.min_price))
                .param("max_price", ParamValue::Float(etl.max_price)),

            StepName::DataSplit => StepSpec::new(
                step,
                format!("{}/train_val_test_split", main.components_repository),
            )
            .param(
                "input",
                ParamValue::str(ArtifactRef::latest("clean_sample.csv").to_string()),
            )
            .param("test_size", ParamValue::Float(modeling.test_size))
            .param("random_seed", ParamValue::Int(modeling.random_seed))
            .param("stratify_by", ParamValue::str(&modeling.stratify_by)),

            StepName::TrainRandomForest => {
                let json = self.config.hyperparameters_json()?;
                let rf_config = workspace.write_file(RF_CONFIG_FILE, &json)?;

                StepSpec::new(step, "src/train_random_forest")
                    .param(
                        "trainval_artifact",
                        ParamValue::str(ArtifactRef::latest("trainval_data.csv").to_string()),
                    )
                    .param("val_size", ParamValue::Float(modeling.val_size))
                    .param("random_seed", ParamValue::Int(modeling.random_seed))
                    .param("stratify_by", ParamValue::str(&modeling.stratify_by))
                    .param(
                        "rf_config",
                        ParamValue::str(rf_config.display().to_string()),
                    )
                    .param(
                        "max_tfidf_features",
                        ParamValue::Int(modeling.max_tfidf_features),
                    )
                    .param("output_artifact", ParamValue::str("random_forest_export"))
            }

            StepName::DataCheck | StepName::TestRegressionModel => return Ok(None),
        };

        Ok(Some(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SAMPLE_CONFIG;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct RecordingDispatcher {
        calls: Arc<Mutex<Vec<StepSpec>>>,
        fail_on: Option<StepName>,
    }

    impl RecordingDispatcher {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                fail_on: None,
            }
        }

        fn failing_on(step: StepName) -> Self {
            let mut dispatcher = Self::new();
            dispatcher.fail_on = Some(step);
            dispatcher
        }

        fn calls(&self) -> Arc<Mutex<Vec<StepSpec>>> {
            self.calls.clone()
        }
    }

    #[async_trait]
    impl StepDispatcher for RecordingDispatcher {
        async fn dispatch(&self, spec: &StepSpec, _ctx: &RunContext) -> Result<(), DispatchError> {
            self.calls.lock().unwrap().push(spec.clone());
            if self.fail_on == Some(spec.id) {
                return Err(DispatchError::NonZeroExit {
                    code: 1,
                    stderr: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn config_with_steps(directive: &str) -> PipelineConfig {
        let yaml = SAMPLE_CONFIG.replace(r#"steps: "all""#, &format!(r#"steps: "{}""#, directive));
        PipelineConfig::from_yaml(&yaml).unwrap()
    }

    #[tokio::test]
    async fn test_all_dispatches_enabled_steps_in_order() {
        let dispatcher = RecordingDispatcher::new();
        let calls = dispatcher.calls();
        let mut runner = PipelineRunner::new(config_with_steps("all"), dispatcher);

        runner.run().await.unwrap();

        let dispatched: Vec<StepName> = calls.lock().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(
            dispatched,
            vec![
                StepName::Download,
                StepName::BasicCleaning,
                StepName::DataSplit,
                StepName::TrainRandomForest,
            ]
        );
        assert_eq!(runner.state().status, RunStatus::Completed);
        assert_eq!(runner.state().dispatched_steps, 4);
        assert_eq!(runner.state().active_steps, TOPOLOGY.len());
    }

    #[tokio::test]
    async fn test_failure_halts_remaining_steps() {
        let dispatcher = RecordingDispatcher::failing_on(StepName::BasicCleaning);
        let calls = dispatcher.calls();
        let mut runner = PipelineRunner::new(config_with_steps("all"), dispatcher);

        let err = runner.run().await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Step {
                step: StepName::BasicCleaning,
                ..
            }
        ));

        let dispatched: Vec<StepName> = calls.lock().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(dispatched, vec![StepName::Download, StepName::BasicCleaning]);
        assert_eq!(runner.state().status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_disabled_steps_are_never_dispatched() {
        let dispatcher = RecordingDispatcher::new();
        let calls = dispatcher.calls();
        let mut runner = PipelineRunner::new(
            config_with_steps("data_check,test_regression_model"),
            dispatcher,
        );

        runner.run().await.unwrap();

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(runner.state().status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn test_training_step_binds_hyperparameter_file() {
        let dispatcher = RecordingDispatcher::new();
        let calls = dispatcher.calls();
        let config = config_with_steps("train_random_forest");
        let expected_json = config.hyperparameters_json().unwrap();
        let mut runner = PipelineRunner::new(config, dispatcher);

        // The dispatcher runs while the workspace is still alive, so the
        // materialized file must be readable at dispatch time.
        let seen_contents = Arc::new(Mutex::new(None::<String>));
        {
            let calls = calls.clone();
            let seen = seen_contents.clone();
            runner.on_event(move |event| {
                if let RunEvent::StepCompleted { .. } = event {
                    let calls = calls.lock().unwrap();
                    let spec = calls.last().unwrap();
                    if let Some(ParamValue::Str(path)) = spec.parameters.get("rf_config") {
                        *seen.lock().unwrap() = std::fs::read_to_string(path).ok();
                    }
                }
            });
        }

        runner.run().await.unwrap();

        assert_eq!(seen_contents.lock().unwrap().as_deref(), Some(expected_json.as_str()));

        // After the run, the workspace and the file are gone.
        let calls = calls.lock().unwrap();
        let spec = calls.last().unwrap();
        match spec.parameters.get("rf_config") {
            Some(ParamValue::Str(path)) => assert!(!std::path::Path::new(path).exists()),
            other => panic!("rf_config parameter missing or wrong type: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_events_emitted_in_order() {
        let dispatcher = RecordingDispatcher::new();
        let mut runner = PipelineRunner::new(config_with_steps("download"), dispatcher);

        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = events.clone();
            runner.on_event(move |event| {
                events.lock().unwrap().push(format!("{:?}", event));
            });
        }

        runner.run().await.unwrap();

        let events = events.lock().unwrap();
        assert!(events.first().unwrap().starts_with("PipelineStarted"));
        assert!(events.last().unwrap().starts_with("PipelineCompleted"));
        assert!(events.iter().any(|e| e.starts_with("StepCompleted")));
    }
}
