use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::filters::{filter_by_min_score, fit_percent};
use crate::view_model::{
    decide_apply_control, AppViewModel, ApplicationRowView, FiltersView, JobCardView,
    NavBadgeView, TailorDialogView,
};
use crate::{
    ApplicationsStore, ApplyReceipt, DraftRecord, JobPosting, SearchFilters, TailorResult,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Jobs,
    Drafts,
    Applications,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    tab: Tab,
    applications: ApplicationsStore,
    poll_interval: Duration,
    filters: SearchFilters,
    jobs: Vec<JobPosting>,
    /// Search, tailor and draft creation share one busy indicator.
    requests_in_flight: usize,
    error: Option<String>,
    selected_job: Option<JobPosting>,
    tailor_result: Option<TailorResult>,
    tailor_open: bool,
    drafts: Vec<DraftRecord>,
    drafts_loading: bool,
    draft_mutations_in_flight: usize,
    drafts_error: Option<String>,
    /// URLs with an outstanding apply request, one per job card.
    applying: BTreeSet<String>,
    apply_errors: BTreeMap<String, String>,
    last_apply_receipt: Option<ApplyReceipt>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            applications: ApplicationsStore::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            filters: SearchFilters::default(),
            jobs: Vec::new(),
            requests_in_flight: 0,
            error: None,
            selected_job: None,
            tailor_result: None,
            tailor_open: false,
            drafts: Vec::new(),
            drafts_loading: false,
            draft_mutations_in_flight: 0,
            drafts_error: None,
            applying: BTreeSet::new(),
            apply_errors: BTreeMap::new(),
            last_apply_receipt: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(filters: SearchFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let store = &self.applications;
        let applications = store
            .list()
            .iter()
            .map(ApplicationRowView::from_record)
            .collect::<Vec<_>>();

        let jobs = filter_by_min_score(&self.jobs, self.filters.min_score())
            .into_iter()
            .map(|job| JobCardView {
                fit_percent: fit_percent(job.score),
                control: decide_apply_control(
                    store.record_for_url(&job.url),
                    self.applying.contains(&job.url),
                ),
                apply_error: self.apply_errors.get(&job.url).cloned(),
                job: job.clone(),
            })
            .collect::<Vec<_>>();

        let tailor = self.selected_job.as_ref().and_then(|job| {
            self.tailor_open.then(|| TailorDialogView {
                company: job.company.clone(),
                result: self.tailor_result.clone(),
            })
        });

        AppViewModel {
            tab: self.tab,
            badge: NavBadgeView {
                running: store.running_count(),
                pulse: store.running_count() > 0,
            },
            application_count: applications.len(),
            applications,
            poll_loading: store.loading(),
            poll_error: store.last_error().map(ToOwned::to_owned),
            filters: FiltersView {
                roles_text: self.filters.roles_text.clone(),
                locations_text: self.filters.locations_text.clone(),
                keywords_text: self.filters.keywords_text.clone(),
                min_score: self.filters.min_score(),
            },
            found_count: jobs.len(),
            jobs,
            drafts: self.drafts.clone(),
            drafts_loading: self.drafts_loading,
            drafts_error: self.drafts_error.clone(),
            tailor,
            busy: self.requests_in_flight > 0,
            error: self.error.clone(),
            last_apply_receipt: self.last_apply_receipt.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the view changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while any request issued through [`crate::update`] is outstanding.
    pub fn has_pending_requests(&self) -> bool {
        self.applications.loading()
            || self.requests_in_flight > 0
            || self.drafts_loading
            || self.draft_mutations_in_flight > 0
            || !self.applying.is_empty()
    }

    pub fn applications(&self) -> &ApplicationsStore {
        &self.applications
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn is_applying(&self, url: &str) -> bool {
        self.applying.contains(url)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn applications_mut(&mut self) -> &mut ApplicationsStore {
        &mut self.applications
    }

    pub(crate) fn filters_mut(&mut self) -> &mut SearchFilters {
        &mut self.filters
    }

    pub(crate) fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    pub(crate) fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub(crate) fn start_request(&mut self) {
        self.requests_in_flight += 1;
        self.error = None;
    }

    pub(crate) fn finish_request(&mut self, error: Option<String>) {
        self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
        if error.is_some() {
            self.error = error;
        }
    }

    pub(crate) fn set_jobs(&mut self, jobs: Vec<JobPosting>) {
        self.jobs = jobs;
    }

    pub(crate) fn select_for_tailoring(&mut self, job: JobPosting) {
        self.selected_job = Some(job);
        self.tailor_result = None;
    }

    pub(crate) fn open_tailor_result(&mut self, result: TailorResult) {
        self.tailor_result = Some(result);
        self.tailor_open = true;
    }

    pub(crate) fn close_tailor(&mut self) {
        self.tailor_open = false;
    }

    pub(crate) fn begin_drafts_fetch(&mut self) {
        self.drafts_loading = true;
    }

    pub(crate) fn finish_drafts_fetch(&mut self, result: Result<Vec<DraftRecord>, String>) {
        self.drafts_loading = false;
        match result {
            Ok(drafts) => {
                self.drafts = drafts;
                self.drafts_error = None;
            }
            Err(message) => self.drafts_error = Some(message),
        }
    }

    pub(crate) fn begin_draft_mutation(&mut self) {
        self.draft_mutations_in_flight += 1;
    }

    pub(crate) fn finish_draft_mutation(&mut self, error: Option<String>) {
        self.draft_mutations_in_flight = self.draft_mutations_in_flight.saturating_sub(1);
        if error.is_some() {
            self.drafts_error = error;
        }
    }

    /// Marks `url` as having an outstanding apply. Returns `false` if one
    /// was already in flight.
    pub(crate) fn begin_apply(&mut self, url: &str) -> bool {
        if !self.applying.insert(url.to_string()) {
            return false;
        }
        self.apply_errors.remove(url);
        true
    }

    pub(crate) fn finish_apply(&mut self, url: &str, result: Result<ApplyReceipt, String>) {
        self.applying.remove(url);
        match result {
            Ok(receipt) => self.last_apply_receipt = Some(receipt),
            Err(message) => {
                self.apply_errors.insert(url.to_string(), message);
            }
        }
    }
}
