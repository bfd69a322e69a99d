//! Step selection from the configuration directive

use crate::core::config::ConfigError;
use crate::core::step::{StepName, TOPOLOGY};
use std::collections::BTreeSet;

/// Literal directive meaning "run every step in the topology".
pub const ALL_STEPS: &str = "all";

/// Resolve the steps directive into the set of active steps.
///
/// The directive is either `"all"` or an exact comma-separated list of wire
/// step names; tokens are not trimmed. Unknown tokens are rejected so a
/// typo fails the run up front instead of silently selecting nothing.
pub fn select_steps(directive: &str) -> Result<BTreeSet<StepName>, ConfigError> {
    if directive == ALL_STEPS {
        return Ok(TOPOLOGY.iter().copied().collect());
    }

    if directive.is_empty() {
        return Err(ConfigError::EmptyDirective);
    }

    directive
        .split(',')
        .map(|token| {
            StepName::parse(token).ok_or_else(|| ConfigError::UnknownStep(token.to_string()))
        })
        .collect()
}
