//! OpsGenie alert priority.

use serde::Serialize;

/// OpsGenie priority levels, `P1` being the most urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
    P4,
    P5,
}

impl Priority {
    /// Resolve a configured priority. Empty or unrecognized values fall back to `P3`.
    pub fn resolve(value: &str) -> Self {
        match value {
            "P1" => Priority::P1,
            "P2" => Priority::P2,
            "P3" => Priority::P3,
            "P4" => Priority::P4,
            "P5" => Priority::P5,
            other => {
                if !other.is_empty() {
                    tracing::debug!(priority = %other, "Unrecognized priority, using P3");
                }
                Priority::default()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P5 => "P5",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
