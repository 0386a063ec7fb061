use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use jobdesk_core::{ApplyJob, Generation, HealthReport, JobPosting, OpaqueId, SearchRequest};
use jobdesk_logging::{desk_debug, desk_info, desk_warn};
use tokio_util::sync::CancellationToken;

use crate::poll::{run_poll_timer, ChannelEventSink, EventSink};
use crate::{Backend, ClientError, ClientSettings, EngineEvent, ReqwestBackend};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("backend client: {0}")]
    Client(#[from] ClientError),
    #[error("async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("no reply from the engine within {0:?}")]
    NoReply(Duration),
    #[error("engine thread stopped")]
    Disconnected,
}

enum EngineCommand {
    StartPolling { interval: Duration },
    StopPolling,
    Request(Request),
    Health {
        reply: mpsc::Sender<Result<HealthReport, ClientError>>,
    },
}

enum Request {
    FetchApplications { generation: Generation },
    SearchJobs { request: SearchRequest },
    Tailor { job: JobPosting },
    CreateDraft { job: JobPosting },
    FetchDrafts,
    ResumeDraft { id: OpaqueId },
    DeleteDraft { id: OpaqueId },
    EnqueueApply { job: ApplyJob },
}

/// Runs backend requests and the poll timer on a background tokio runtime.
///
/// Commands are fire-and-forget; outcomes arrive later as [`EngineEvent`]s in
/// completion order. Dropping the handle stops the timer and the thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut poll_cancel: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { interval } => {
                        if let Some(previous) = poll_cancel.take() {
                            previous.cancel();
                        }
                        if interval.is_zero() {
                            desk_warn!("Ignoring poll timer with zero interval");
                            continue;
                        }
                        desk_info!("Poll timer started interval_ms={}", interval.as_millis());
                        let token = CancellationToken::new();
                        poll_cancel = Some(token.clone());
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            run_poll_timer(interval, token, sink.as_ref()).await;
                        });
                    }
                    EngineCommand::StopPolling => {
                        if let Some(token) = poll_cancel.take() {
                            desk_info!("Poll timer stopped");
                            token.cancel();
                        }
                    }
                    EngineCommand::Request(request) => {
                        let backend = backend.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let event = handle_request(backend.as_ref(), request).await;
                            sink.emit(event);
                        });
                    }
                    EngineCommand::Health { reply } => {
                        let backend = backend.clone();
                        runtime.spawn(async move {
                            let _ = reply.send(backend.health().await);
                        });
                    }
                }
            }

            if let Some(token) = poll_cancel.take() {
                token.cancel();
            }
            desk_debug!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_polling(&self, interval: Duration) {
        self.send(EngineCommand::StartPolling { interval });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn fetch_applications(&self, generation: Generation) {
        self.send(EngineCommand::Request(Request::FetchApplications { generation }));
    }

    pub fn search_jobs(&self, request: SearchRequest) {
        self.send(EngineCommand::Request(Request::SearchJobs { request }));
    }

    pub fn tailor(&self, job: JobPosting) {
        self.send(EngineCommand::Request(Request::Tailor { job }));
    }

    pub fn create_draft(&self, job: JobPosting) {
        self.send(EngineCommand::Request(Request::CreateDraft { job }));
    }

    pub fn fetch_drafts(&self) {
        self.send(EngineCommand::Request(Request::FetchDrafts));
    }

    pub fn resume_draft(&self, id: OpaqueId) {
        self.send(EngineCommand::Request(Request::ResumeDraft { id }));
    }

    pub fn delete_draft(&self, id: OpaqueId) {
        self.send(EngineCommand::Request(Request::DeleteDraft { id }));
    }

    pub fn enqueue_apply(&self, job: ApplyJob) {
        self.send(EngineCommand::Request(Request::EnqueueApply { job }));
    }

    /// Blocking health check; the result bypasses the event channel.
    pub fn check_health(&self, timeout: Duration) -> Result<HealthReport, EngineError> {
        let (reply, result) = mpsc::channel();
        self.send(EngineCommand::Health { reply });
        let report = result
            .recv_timeout(timeout)
            .map_err(|_| EngineError::NoReply(timeout))??;
        Ok(report)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` on timeout;
    /// an error once the engine thread has gone away.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            desk_warn!("Engine thread is gone; dropping command");
        }
    }
}

async fn handle_request(backend: &dyn Backend, request: Request) -> EngineEvent {
    match request {
        Request::FetchApplications { generation } => EngineEvent::ApplicationsFetched {
            generation,
            result: backend.list_applications().await,
        },
        Request::SearchJobs { request } => {
            EngineEvent::JobsFetched(backend.search_jobs(&request).await)
        }
        Request::Tailor { job } => EngineEvent::Tailored(backend.tailor(&job).await),
        Request::CreateDraft { job } => {
            EngineEvent::DraftCreated(backend.create_draft(&job).await)
        }
        Request::FetchDrafts => EngineEvent::DraftsFetched(backend.list_drafts().await),
        Request::ResumeDraft { id } => {
            let result = backend.resume_draft(&id).await;
            EngineEvent::DraftMutated { id, result }
        }
        Request::DeleteDraft { id } => {
            let result = backend.delete_draft(&id).await;
            EngineEvent::DraftMutated { id, result }
        }
        Request::EnqueueApply { job } => {
            let url = job.job.url.clone();
            let result = backend.enqueue_apply(std::slice::from_ref(&job)).await;
            EngineEvent::ApplyFinished { url, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_event_channel_is_reported() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        drop(event_tx);
        let engine = EngineHandle { cmd_tx, event_rx };

        let started = std::time::Instant::now();
        let result = engine.recv_timeout(Duration::from_secs(5));

        assert!(matches!(result, Err(EngineError::Disconnected)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
