//! Versioned artifact references

use std::fmt;

/// Sentinel version meaning "most recent".
pub const LATEST: &str = "latest";

/// A named, versioned handle to a step input or output.
///
/// The orchestrator never resolves these; they are passed as opaque
/// `name:version` strings to step executables, which read and write through
/// the external artifact store. The string format is part of the wire
/// contract between steps and must survive a parse/format round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: String,
}

impl ArtifactRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Reference the most recent version of a named artifact.
    pub fn latest(name: impl Into<String>) -> Self {
        Self::new(name, LATEST)
    }

    /// Parse a `name:version` string. A bare name resolves to `latest`.
    pub fn parse(s: &str) -> Self {
        match s.rsplit_once(':') {
            Some((name, version)) if !name.is_empty() => Self::new(name, version),
            _ => Self::latest(s),
        }
    }

    /// Whether this reference floats to the most recent version.
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_preserves_wire_contract() {
        assert_eq!(ArtifactRef::latest("sample.csv").to_string(), "sample.csv:latest");
        assert_eq!(
            ArtifactRef::new("clean_sample.csv", "v3").to_string(),
            "clean_sample.csv:v3"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed = ArtifactRef::parse("trainval_data.csv:latest");
        assert_eq!(parsed.name, "trainval_data.csv");
        assert!(parsed.is_latest());
        assert_eq!(parsed.to_string(), "trainval_data.csv:latest");
    }

    #[test]
    fn test_parse_bare_name_defaults_to_latest() {
        let parsed = ArtifactRef::parse("sample.csv");
        assert_eq!(parsed, ArtifactRef::latest("sample.csv"));
    }

    #[test]
    fn test_parse_concrete_version() {
        let parsed = ArtifactRef::parse("model:v12");
        assert_eq!(parsed.version, "v12");
        assert!(!parsed.is_latest());
    }
}
