use jobdesk_logging::{desk_debug, desk_info, desk_warn};

use crate::{AppState, ApplyJob, Effect, Msg, Tab};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Activate { interval } => {
            state.set_poll_interval(interval);
            let generation = state.applications_mut().activate();
            state.mark_dirty();
            vec![
                Effect::StartPolling { interval },
                Effect::FetchApplications { generation },
            ]
        }
        Msg::Deactivate => {
            if !state.applications().is_active() {
                return (state, Vec::new());
            }
            state.applications_mut().deactivate();
            state.mark_dirty();
            vec![Effect::StopPolling]
        }
        // Ticks coalesce while a fetch is outstanding.
        Msg::PollTick if state.applications().loading() => {
            desk_debug!(
                "Poll tick skipped: gen={} still in flight",
                state.applications().latest_generation()
            );
            Vec::new()
        }
        Msg::PollTick => match state.applications_mut().begin_fetch() {
            Some(generation) => {
                state.mark_dirty();
                vec![Effect::FetchApplications { generation }]
            }
            None => Vec::new(),
        },
        Msg::ApplicationsFetched { generation, result } => {
            if let Err(message) = &result {
                desk_warn!("Applications fetch gen={generation} failed: {message}");
            }
            if state.applications_mut().complete_fetch(generation, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RolesChanged(text) => {
            state.filters_mut().roles_text = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::LocationsChanged(text) => {
            state.filters_mut().locations_text = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::KeywordsChanged(text) => {
            state.filters_mut().keywords_text = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::MinScoreChanged(value) => {
            state.filters_mut().set_min_score(value);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SearchClicked => {
            let request = state.filters().to_request();
            state.start_request();
            state.mark_dirty();
            vec![Effect::SearchJobs { request }]
        }
        Msg::JobsFetched(result) => {
            match result {
                Ok(jobs) => {
                    desk_info!("Search returned {} job(s)", jobs.len());
                    state.set_jobs(jobs);
                    state.finish_request(None);
                }
                Err(message) => state.finish_request(Some(message)),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::TailorClicked(job) => {
            state.start_request();
            state.select_for_tailoring(job.clone());
            state.mark_dirty();
            vec![Effect::TailorJob { job }]
        }
        Msg::Tailored(result) => {
            match result {
                Ok(tailored) => {
                    state.finish_request(None);
                    state.open_tailor_result(tailored);
                }
                Err(message) => state.finish_request(Some(message)),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::TailorClosed => {
            state.close_tailor();
            state.mark_dirty();
            Vec::new()
        }
        Msg::CreateDraftClicked(job) => {
            state.start_request();
            state.mark_dirty();
            vec![Effect::CreateDraft { job }]
        }
        Msg::DraftCreated(result) => {
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.finish_request(None);
                    state.set_tab(Tab::Drafts);
                    state.begin_drafts_fetch();
                    vec![Effect::FetchDrafts]
                }
                Err(message) => {
                    state.finish_request(Some(message));
                    Vec::new()
                }
            }
        }
        Msg::DraftsRequested => {
            state.begin_drafts_fetch();
            state.mark_dirty();
            vec![Effect::FetchDrafts]
        }
        Msg::DraftsFetched(result) => {
            state.finish_drafts_fetch(result);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResumeDraftClicked(id) => {
            state.begin_draft_mutation();
            state.mark_dirty();
            vec![Effect::ResumeDraft { id }]
        }
        Msg::DeleteDraftClicked(id) => {
            state.begin_draft_mutation();
            state.mark_dirty();
            vec![Effect::DeleteDraft { id }]
        }
        Msg::DraftMutated(result) => {
            state.finish_draft_mutation(result.err());
            state.begin_drafts_fetch();
            state.mark_dirty();
            vec![Effect::FetchDrafts]
        }
        Msg::ApplyClicked(job) => {
            if let Some(current) = state.applications().record_for_url(&job.url) {
                desk_debug!(
                    "Apply ignored for {}: already tracked as {}",
                    job.url,
                    current.status.as_wire()
                );
                return (state, Vec::new());
            }
            if !state.begin_apply(&job.url) {
                desk_debug!("Apply ignored for {}: request already in flight", job.url);
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::EnqueueApply {
                job: ApplyJob::from(job),
            }]
        }
        Msg::ApplyFinished { url, result } => {
            if let Err(message) = &result {
                desk_warn!("Apply for {url} failed: {message}");
            }
            state.finish_apply(&url, result);
            state.mark_dirty();
            Vec::new()
        }
        Msg::TabSelected(tab) => {
            state.set_tab(tab);
            state.mark_dirty();
            if tab == Tab::Drafts {
                state.begin_drafts_fetch();
                vec![Effect::FetchDrafts]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}
