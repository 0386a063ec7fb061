use std::time::Duration;

use jobdesk_client::{ClientError, EngineError, EngineEvent, EngineHandle};
use jobdesk_core::{Effect, Msg};
use jobdesk_logging::{desk_debug, desk_info, desk_warn};

/// Executes effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { interval } => {
                    self.engine.start_polling(interval);
                }
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::FetchApplications { generation } => {
                    desk_debug!("FetchApplications gen={}", generation);
                    self.engine.fetch_applications(generation);
                }
                Effect::SearchJobs { request } => {
                    desk_info!(
                        "SearchJobs roles={} locations={} keywords={} min_score={}",
                        request.roles.len(),
                        request.locations.len(),
                        request.keywords.len(),
                        request.min_score
                    );
                    self.engine.search_jobs(request);
                }
                Effect::TailorJob { job } => self.engine.tailor(job),
                Effect::CreateDraft { job } => self.engine.create_draft(job),
                Effect::FetchDrafts => self.engine.fetch_drafts(),
                Effect::ResumeDraft { id } => self.engine.resume_draft(id),
                Effect::DeleteDraft { id } => self.engine.delete_draft(id),
                Effect::EnqueueApply { job } => {
                    desk_info!("EnqueueApply url={}", job.job.url);
                    self.engine.enqueue_apply(job);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event, already translated.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.map(event_to_msg))
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PollDue => Msg::PollTick,
        EngineEvent::ApplicationsFetched { generation, result } => Msg::ApplicationsFetched {
            generation,
            result: result.map_err(describe),
        },
        EngineEvent::JobsFetched(result) => Msg::JobsFetched(result.map_err(describe)),
        EngineEvent::Tailored(result) => Msg::Tailored(result.map_err(describe)),
        EngineEvent::DraftCreated(result) => {
            Msg::DraftCreated(result.map(|_| ()).map_err(describe))
        }
        EngineEvent::DraftsFetched(result) => Msg::DraftsFetched(result.map_err(describe)),
        EngineEvent::DraftMutated { id, result } => {
            if let Err(err) = &result {
                desk_warn!("Draft {} mutation failed", id);
                desk_debug!("{}", err.message);
            }
            Msg::DraftMutated(result.map(|_| ()).map_err(describe))
        }
        EngineEvent::ApplyFinished { url, result } => Msg::ApplyFinished {
            url,
            result: result.map_err(describe),
        },
    }
}

/// The short display goes to the user; transport detail goes to the log.
fn describe(err: ClientError) -> String {
    desk_debug!("{}: {}", err, err.message);
    err.to_string()
}
