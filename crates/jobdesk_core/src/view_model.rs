use crate::{
    ApplicationRecord, ApplicationStatus, ApplyReceipt, ArtifactLinks, DraftRecord, JobPosting,
    OpaqueId, Tab, TailorResult,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub tab: Tab,
    pub badge: NavBadgeView,
    pub applications: Vec<ApplicationRowView>,
    pub application_count: usize,
    pub poll_loading: bool,
    pub poll_error: Option<String>,
    pub filters: FiltersView,
    /// Job cards after the local minimum-score filter.
    pub jobs: Vec<JobCardView>,
    pub found_count: usize,
    pub drafts: Vec<DraftRecord>,
    pub drafts_loading: bool,
    pub drafts_error: Option<String>,
    pub tailor: Option<TailorDialogView>,
    pub busy: bool,
    pub error: Option<String>,
    pub last_apply_receipt: Option<ApplyReceipt>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavBadgeView {
    pub running: usize,
    pub pulse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FiltersView {
    pub roles_text: String,
    pub locations_text: String,
    pub keywords_text: String,
    pub min_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRowView {
    pub id: OpaqueId,
    pub url: String,
    pub company: Option<String>,
    pub title: Option<String>,
    pub portal: Option<String>,
    pub status: ApplicationStatus,
    pub updated_at: Option<String>,
    pub links: ArtifactLinks,
}

impl ApplicationRowView {
    pub(crate) fn from_record(record: &ApplicationRecord) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            company: non_empty(record.company.as_deref()),
            title: non_empty(record.title.as_deref()),
            portal: non_empty(record.portal.as_deref()),
            status: record.status.clone(),
            updated_at: record.updated_at.clone(),
            links: record.artifact_links(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobCardView {
    pub job: JobPosting,
    pub fit_percent: u8,
    pub control: ApplyControl,
    pub apply_error: Option<String>,
}

/// What a job card shows in place of the Apply button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyControl {
    /// The URL is already tracked; show its status read-only.
    StatusPill(ApplicationStatus),
    /// Actionable; `busy` disables the control while a request is in flight.
    Apply { busy: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailorDialogView {
    pub company: String,
    pub result: Option<TailorResult>,
}

/// A tracked record always wins over the actionable control, whatever its
/// status.
pub fn decide_apply_control(current: Option<&ApplicationRecord>, busy: bool) -> ApplyControl {
    match current {
        Some(record) => ApplyControl::StatusPill(record.status.clone()),
        None => ApplyControl::Apply { busy },
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}
