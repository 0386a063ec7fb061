use std::time::Duration;

use crate::{ApplyJob, Generation, JobPosting, OpaqueId, SearchRequest};

/// Side effects requested by [`crate::update`]; executed by the app layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the repeating poll timer (replacing any running one).
    StartPolling { interval: Duration },
    /// Cancel the poll timer.
    StopPolling,
    FetchApplications { generation: Generation },
    SearchJobs { request: SearchRequest },
    TailorJob { job: JobPosting },
    CreateDraft { job: JobPosting },
    FetchDrafts,
    ResumeDraft { id: OpaqueId },
    DeleteDraft { id: OpaqueId },
    /// Fire-and-forget enqueue; the next poll reflects the new record.
    EnqueueApply { job: ApplyJob },
}
