//! Per-run execution context

use crate::core::config::PipelineConfig;

/// Identity values every step of one run is tagged with.
///
/// Carried explicitly through the dispatcher and applied to each child
/// process environment, never set as process-wide state, so multiple
/// runners can coexist in one process (tests, a future service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Project the run's artifacts belong to.
    pub project: String,

    /// Experiment group shared by all steps of this run.
    pub experiment_group: String,
}

impl RunContext {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            project: config.main.project_name.clone(),
            experiment_group: config.main.experiment_name.clone(),
        }
    }

    /// Environment variables injected into every child execution.
    pub fn env_vars(&self) -> [(&'static str, &str); 2] {
        [
            ("WANDB_PROJECT", self.project.as_str()),
            ("WANDB_RUN_GROUP", self.experiment_group.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SAMPLE_CONFIG;

    #[test]
    fn test_context_from_config() {
        let config = PipelineConfig::from_yaml(SAMPLE_CONFIG).unwrap();
        let ctx = RunContext::from_config(&config);
        assert_eq!(ctx.project, "nyc_airbnb");
        assert_eq!(ctx.experiment_group, "development");
    }

    #[test]
    fn test_env_vars() {
        let ctx = RunContext {
            project: "p".to_string(),
            experiment_group: "g".to_string(),
        };
        let env = ctx.env_vars();
        assert_eq!(env[0], ("WANDB_PROJECT", "p"));
        assert_eq!(env[1], ("WANDB_RUN_GROUP", "g"));
    }
}
