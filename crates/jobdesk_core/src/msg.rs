use std::time::Duration;

use crate::{
    ApplicationRecord, ApplyReceipt, DraftRecord, Generation, JobPosting, OpaqueId, Tab,
    TailorResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Dashboard mounted: start polling applications every `interval`.
    Activate { interval: Duration },
    /// Dashboard no longer interested in applications.
    Deactivate,
    /// Poll timer fired.
    PollTick,
    /// Applications list fetch completed.
    ApplicationsFetched {
        generation: Generation,
        result: Result<Vec<ApplicationRecord>, String>,
    },
    /// User edited the roles filter (comma separated).
    RolesChanged(String),
    /// User edited the locations filter (comma separated).
    LocationsChanged(String),
    /// User edited the keywords filter (comma separated).
    KeywordsChanged(String),
    /// User moved the minimum fit score slider.
    MinScoreChanged(u8),
    /// User clicked Search / Sync.
    SearchClicked,
    JobsFetched(Result<Vec<JobPosting>, String>),
    TailorClicked(JobPosting),
    Tailored(Result<TailorResult, String>),
    /// User closed the tailor dialog.
    TailorClosed,
    CreateDraftClicked(JobPosting),
    DraftCreated(Result<(), String>),
    /// User asked for the drafts list (Drafts button).
    DraftsRequested,
    DraftsFetched(Result<Vec<DraftRecord>, String>),
    ResumeDraftClicked(OpaqueId),
    DeleteDraftClicked(OpaqueId),
    /// Resume or delete round trip finished.
    DraftMutated(Result<(), String>),
    /// User clicked Apply on a job card.
    ApplyClicked(JobPosting),
    ApplyFinished {
        url: String,
        result: Result<ApplyReceipt, String>,
    },
    TabSelected(Tab),
}
