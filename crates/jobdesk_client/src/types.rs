use std::fmt;

use jobdesk_core::{
    ApplicationRecord, ApplyReceipt, DraftRecord, Generation, JobPosting, OpaqueId,
    TailorResult,
};

/// Backend operation a request belongs to, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListApplications,
    EnqueueApply,
    SearchJobs,
    Tailor,
    CreateDraft,
    ListDrafts,
    ResumeDraft,
    DeleteDraft,
    Health,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::ListApplications => "fetch applications",
            Operation::EnqueueApply => "enqueue application",
            Operation::SearchJobs => "search jobs",
            Operation::Tailor => "tailor",
            Operation::CreateDraft => "create draft",
            Operation::ListDrafts => "fetch drafts",
            Operation::ResumeDraft => "resume draft",
            Operation::DeleteDraft => "delete draft",
            Operation::Health => "health check",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body did not have the expected shape.
    MalformedBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedBody => write!(f, "malformed response"),
        }
    }
}

/// A failed backend round trip. Displays as a short message suitable for an
/// error indicator; `message` keeps the transport detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to {operation}: {kind}")]
pub struct ClientError {
    pub operation: Operation,
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(operation: Operation, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }
}

/// Events reported by the engine thread back to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The poll timer fired.
    PollDue,
    ApplicationsFetched {
        generation: Generation,
        result: Result<Vec<ApplicationRecord>, ClientError>,
    },
    JobsFetched(Result<Vec<JobPosting>, ClientError>),
    Tailored(Result<TailorResult, ClientError>),
    DraftCreated(Result<serde_json::Value, ClientError>),
    DraftsFetched(Result<Vec<DraftRecord>, ClientError>),
    DraftMutated {
        id: OpaqueId,
        result: Result<serde_json::Value, ClientError>,
    },
    ApplyFinished {
        url: String,
        result: Result<ApplyReceipt, ClientError>,
    },
}
