//! Jobdesk core: data model, applications polling store and the pure
//! dashboard state machine.
mod effect;
mod filters;
mod model;
mod msg;
mod state;
mod status;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use filters::{
    filter_by_min_score, fit_percent, split_list, SearchFilters, DEFAULT_KEYWORDS,
    DEFAULT_LOCATIONS, DEFAULT_MIN_SCORE, DEFAULT_ROLES,
};
pub use model::{
    ApplicationRecord, ApplyJob, ApplyReceipt, ArtifactLinks, DraftRecord, HealthReport,
    JobPosting, OpaqueId, SearchRequest, TailorResult,
};
pub use msg::Msg;
pub use state::{AppState, Tab, DEFAULT_POLL_INTERVAL};
pub use status::ApplicationStatus;
pub use store::{index_by_url, running_count, ApplicationsStore, Generation};
pub use update::update;
pub use view_model::{
    decide_apply_control, AppViewModel, ApplicationRowView, ApplyControl, FiltersView,
    JobCardView, NavBadgeView, TailorDialogView,
};
