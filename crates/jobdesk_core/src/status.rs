use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of an application as reported by the backend.
///
/// The wire value is an upper-case string. Values outside the known set are
/// kept verbatim in [`ApplicationStatus::Unknown`] so that rendering stays a
/// total function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ApplicationStatus {
    /// The backend reports an application without tasks as queued.
    #[default]
    Queued,
    InProgress,
    Drafted,
    Submitted,
    Done,
    Failed,
    Cancelled,
    Unknown(String),
}

impl ApplicationStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "QUEUED" => Self::Queued,
            "IN_PROGRESS" => Self::InProgress,
            "DRAFTED" => Self::Drafted,
            "SUBMITTED" => Self::Submitted,
            "DONE" => Self::Done,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Drafted => "DRAFTED",
            Self::Submitted => "SUBMITTED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human-facing label for the status pill. Unknown values render as-is.
    pub fn label(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::InProgress => "In progress",
            Self::Drafted => "Drafted",
            Self::Submitted => "Submitted",
            Self::Done => "Done",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Counts toward the nav badge.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}
