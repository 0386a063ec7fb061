use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::ArgMatches;
use jobdesk_client::EngineHandle;
use jobdesk_core::{update, AppState, JobPosting, Msg, OpaqueId, Tab};
use jobdesk_logging::{desk_debug, desk_info, desk_warn};

use crate::config::{resolve_base_url, AppConfig, API_ENV_VAR};
use crate::effects::EffectRunner;
use crate::render::{status_pill, Renderer};

/// Upper bound for one-shot commands waiting on the backend.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(120);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Owns the dashboard state and feeds it messages from the engine.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    /// First user-facing request failure seen since the last check.
    failure: Option<String>,
}

impl App {
    pub fn new(state: AppState, runner: EffectRunner, renderer: Renderer) -> Self {
        Self {
            state,
            runner,
            renderer,
            failure: None,
        }
    }

    /// Runs `msg` through [`update`] and executes the resulting effects.
    /// Returns whether the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        if self.failure.is_none() {
            self.failure = request_failure(&msg);
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        dirty
    }

    /// Pumps engine events until no request is outstanding.
    pub fn settle(&mut self) -> anyhow::Result<()> {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while self.state.has_pending_requests() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.runner.next_msg(remaining)? {
                Some(msg) => {
                    self.dispatch(msg);
                }
                None => bail!("backend did not respond within {:?}", SETTLE_TIMEOUT),
            }
        }
        Ok(())
    }

    fn take_failure(&mut self) -> Option<String> {
        self.failure.take()
    }

    /// Fetches the applications list once so apply decisions can be made.
    fn load_applications(&mut self) -> anyhow::Result<()> {
        self.dispatch(Msg::Activate {
            interval: self.state.poll_interval(),
        });
        self.settle()
    }

    fn watch(&mut self, interval: Duration, refreshes: Option<u32>) -> anyhow::Result<()> {
        let clear = std::io::stdout().is_terminal();
        let mut applied = 0u32;

        self.dispatch(Msg::Activate { interval });
        self.print_applications(clear);
        loop {
            let Some(msg) = self.runner.next_msg(Duration::from_secs(3600))? else {
                continue;
            };
            let fetched = matches!(msg, Msg::ApplicationsFetched { .. });
            if !self.dispatch(msg) {
                continue;
            }
            self.print_applications(clear);
            if fetched && !self.state.applications().loading() {
                applied += 1;
                desk_debug!("Applied refresh #{applied}");
            }
            if refreshes.is_some_and(|limit| applied >= limit) {
                break;
            }
        }
        self.dispatch(Msg::Deactivate);
        Ok(())
    }

    fn print_applications(&self, clear: bool) {
        if clear {
            print!("{CLEAR_SCREEN}");
        }
        print!("{}", self.renderer.applications(&self.state.view()));
    }

    fn search(&mut self, matches: &ArgMatches) -> anyhow::Result<()> {
        self.load_applications()?;
        for (arg, to_msg) in [
            ("roles", Msg::RolesChanged as fn(String) -> Msg),
            ("locations", Msg::LocationsChanged),
            ("keywords", Msg::KeywordsChanged),
        ] {
            if let Some(text) = matches.get_one::<String>(arg) {
                self.dispatch(to_msg(text.clone()));
            }
        }
        if let Some(min_score) = matches.get_one::<u8>("min-score") {
            self.dispatch(Msg::MinScoreChanged(*min_score));
        }

        self.dispatch(Msg::SearchClicked);
        self.settle()?;
        self.dispatch(Msg::Deactivate);

        if let Some(error) = self.take_failure() {
            bail!(error);
        }
        let view = self.state.view();
        if let Some(error) = &view.poll_error {
            desk_warn!("Apply decisions may be stale: {error}");
        }
        print!("{}", self.renderer.job_cards(&view));
        Ok(())
    }

    fn apply(&mut self, job: JobPosting) -> anyhow::Result<()> {
        self.load_applications()?;
        if let Some(error) = self.state.applications().last_error() {
            bail!("{error}");
        }
        if let Some(record) = self.state.applications().record_for_url(&job.url) {
            println!("Already tracked {}", status_pill(&record.status));
            self.dispatch(Msg::Deactivate);
            return Ok(());
        }

        self.dispatch(Msg::ApplyClicked(job.clone()));
        self.settle()?;
        if let Some(error) = self.take_failure() {
            self.dispatch(Msg::Deactivate);
            bail!(error);
        }
        if let Some(receipt) = &self.state.view().last_apply_receipt {
            print!("{}", self.renderer.receipt(receipt));
        }

        self.dispatch(Msg::PollTick);
        self.settle()?;
        if let Some(record) = self.state.applications().record_for_url(&job.url) {
            println!("Status {}", status_pill(&record.status));
        }
        self.dispatch(Msg::Deactivate);
        Ok(())
    }

    fn tailor(&mut self, job: JobPosting) -> anyhow::Result<()> {
        self.dispatch(Msg::TailorClicked(job));
        self.settle()?;
        if let Some(error) = self.take_failure() {
            bail!(error);
        }
        if let Some(dialog) = &self.state.view().tailor {
            print!("{}", self.renderer.tailor(dialog));
        }
        self.dispatch(Msg::TailorClosed);
        Ok(())
    }

    fn drafts(&mut self, matches: &ArgMatches) -> anyhow::Result<()> {
        let msg = match matches.subcommand() {
            Some(("list", _)) => Msg::TabSelected(Tab::Drafts),
            Some(("create", sub)) => Msg::CreateDraftClicked(job_from_args(sub)?),
            Some(("resume", sub)) => Msg::ResumeDraftClicked(draft_id(sub)?),
            Some(("delete", sub)) => Msg::DeleteDraftClicked(draft_id(sub)?),
            _ => bail!("Unknown drafts subcommand"),
        };
        self.dispatch(msg);
        self.settle()?;
        if let Some(error) = self.take_failure() {
            bail!(error);
        }

        print!("{}", self.renderer.drafts(&self.state.view()));
        Ok(())
    }
}

/// Failures of user-initiated requests; background poll errors stay in the
/// applications store instead.
fn request_failure(msg: &Msg) -> Option<String> {
    match msg {
        Msg::JobsFetched(Err(error))
        | Msg::Tailored(Err(error))
        | Msg::DraftCreated(Err(error))
        | Msg::DraftsFetched(Err(error))
        | Msg::DraftMutated(Err(error))
        | Msg::ApplyFinished {
            result: Err(error), ..
        } => Some(error.clone()),
        _ => None,
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> anyhow::Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("--{name} is required"))
}

fn job_from_args(matches: &ArgMatches) -> anyhow::Result<JobPosting> {
    let mut job = JobPosting::new(
        required(matches, "title")?.as_str(),
        required(matches, "company")?.as_str(),
        required(matches, "url")?.as_str(),
    );
    let optional = |name: &str| {
        matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
    };
    job.source = optional("source");
    job.location = optional("location");
    job.jd_text = optional("jd-text");
    Ok(job)
}

fn draft_id(matches: &ArgMatches) -> anyhow::Result<OpaqueId> {
    Ok(OpaqueId::from(required(matches, "id")?.as_str()))
}

pub fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = AppConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let env_api = std::env::var(API_ENV_VAR).ok();
    let base_url = resolve_base_url(
        matches.get_one::<String>("api").map(String::as_str),
        env_api.as_deref(),
        &config,
    );
    let settings = config.client_settings(base_url);
    desk_info!("Using backend {}", settings.base_url);

    let renderer = Renderer::new(&settings);
    let engine = EngineHandle::new(settings).context("failed to start backend client")?;

    if let Some(("health", _)) = matches.subcommand() {
        let report = engine.check_health(SETTLE_TIMEOUT)?;
        print!("{}", renderer.health(&report));
        return Ok(());
    }

    let state = AppState::with_filters(config.search_filters());
    let mut app = App::new(state, EffectRunner::new(engine), renderer);

    match matches.subcommand() {
        Some(("watch", sub)) => {
            let interval = sub
                .get_one::<u64>("interval-ms")
                .map(|ms| Duration::from_millis(*ms))
                .unwrap_or_else(|| config.poll_interval());
            app.watch(interval, sub.get_one::<u32>("refreshes").copied())
        }
        Some(("search", sub)) => app.search(sub),
        Some(("apply", sub)) => app.apply(job_from_args(sub)?),
        Some(("tailor", sub)) => app.tailor(job_from_args(sub)?),
        Some(("drafts", sub)) => app.drafts(sub),
        _ => bail!("Unknown command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;
    use jobdesk_core::ApplyReceipt;
    use pretty_assertions::assert_eq;

    #[test]
    fn job_fields_come_from_args() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "jobdesk", "tailor", "--url", "https://jobs.example/1", "--title", "ML Engineer",
                "--company", "Acme", "--jd-text", "Build models",
            ])
            .unwrap();
        let job = job_from_args(matches.subcommand_matches("tailor").unwrap()).unwrap();
        assert_eq!(job.url, "https://jobs.example/1");
        assert_eq!(job.jd_text.as_deref(), Some("Build models"));
        assert_eq!(job.source, None);
    }

    #[test]
    fn numeric_draft_ids_become_integers() {
        let matches = build_cli()
            .try_get_matches_from(vec!["jobdesk", "drafts", "resume", "7"])
            .unwrap();
        let resume = matches
            .subcommand_matches("drafts")
            .and_then(|m| m.subcommand_matches("resume"))
            .unwrap();
        assert_eq!(draft_id(resume).unwrap(), OpaqueId::Int(7));
    }

    #[test]
    fn only_request_failures_are_reported() {
        assert_eq!(
            request_failure(&Msg::ApplicationsFetched {
                generation: 1,
                result: Err("Failed to fetch applications: timeout".into()),
            }),
            None
        );
        assert_eq!(
            request_failure(&Msg::ApplyFinished {
                url: "u".into(),
                result: Err("Failed to enqueue application: http status 500".into()),
            }),
            Some("Failed to enqueue application: http status 500".to_string())
        );
        assert_eq!(
            request_failure(&Msg::ApplyFinished {
                url: "u".into(),
                result: Ok(ApplyReceipt::default()),
            }),
            None
        );
    }
}
