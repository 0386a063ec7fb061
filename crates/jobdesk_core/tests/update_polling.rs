use std::sync::Once;
use std::time::Duration;

use jobdesk_core::{
    update, AppState, ApplicationRecord, ApplicationStatus, Effect, Generation, Msg,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobdesk_logging::initialize_for_tests);
}

fn activate(state: AppState) -> (AppState, Generation) {
    let (state, effects) = update(
        state,
        Msg::Activate {
            interval: Duration::from_millis(4000),
        },
    );
    let generation = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchApplications { generation } => Some(*generation),
            _ => None,
        })
        .expect("fetch effect");
    (state, generation)
}

fn records() -> Vec<ApplicationRecord> {
    vec![
        ApplicationRecord::new(1, "https://a.example/jobs/1", ApplicationStatus::Queued),
        ApplicationRecord::new(2, "https://b.example/jobs/2", ApplicationStatus::InProgress),
        ApplicationRecord::new(3, "https://c.example/jobs/3", ApplicationStatus::Submitted),
    ]
}

#[test]
fn activate_starts_timer_and_fetches_immediately() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::Activate {
            interval: Duration::from_millis(2500),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::StartPolling {
                interval: Duration::from_millis(2500)
            },
            Effect::FetchApplications { generation: 1 },
        ]
    );
    assert!(state.view().poll_loading);
    assert_eq!(state.poll_interval(), Duration::from_millis(2500));
    assert!(state.consume_dirty());
}

#[test]
fn fetched_list_drives_badge_and_rows() {
    init_logging();
    let (state, generation) = activate(AppState::new());
    let (mut state, effects) = update(
        state,
        Msg::ApplicationsFetched {
            generation,
            result: Ok(records()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.application_count, 3);
    assert_eq!(view.badge.running, 2);
    assert!(view.badge.pulse);
    assert!(!view.poll_loading);
    assert_eq!(view.applications[2].status.label(), "Submitted");
    assert!(state.consume_dirty());
}

#[test]
fn poll_tick_issues_next_generation() {
    init_logging();
    let (state, generation) = activate(AppState::new());
    let (state, _) = update(
        state,
        Msg::ApplicationsFetched {
            generation,
            result: Ok(Vec::new()),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(
        effects,
        vec![Effect::FetchApplications {
            generation: generation + 1
        }]
    );
    assert!(state.view().poll_loading);
}

#[test]
fn ticks_coalesce_while_fetch_is_in_flight() {
    init_logging();
    let (state, generation) = activate(AppState::new());

    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    assert_eq!(state.applications().latest_generation(), generation);

    let (state, _) = update(
        state,
        Msg::ApplicationsFetched {
            generation,
            result: Ok(records()),
        },
    );
    assert!(!state.has_pending_requests());
    assert_eq!(state.view().application_count, 3);

    let (_, effects) = update(state, Msg::PollTick);
    assert_eq!(
        effects,
        vec![Effect::FetchApplications {
            generation: generation + 1
        }]
    );
}

#[test]
fn failed_poll_surfaces_error_and_keeps_rows() {
    init_logging();
    let (state, generation) = activate(AppState::new());
    let (state, _) = update(
        state,
        Msg::ApplicationsFetched {
            generation,
            result: Ok(records()),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    let next = match effects.as_slice() {
        [Effect::FetchApplications { generation }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::ApplicationsFetched {
            generation: next,
            result: Err("http status 502".into()),
        },
    );

    let view = state.view();
    assert_eq!(view.application_count, 3);
    assert_eq!(view.badge.running, 2);
    assert_eq!(view.poll_error.as_deref(), Some("http status 502"));
}

#[test]
fn deactivate_stops_timer_and_drops_in_flight_result() {
    init_logging();
    let (state, generation) = activate(AppState::new());
    let (mut state, effects) = update(state, Msg::Deactivate);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(state.consume_dirty());
    let before = state.view();

    let (mut state, effects) = update(
        state,
        Msg::ApplicationsFetched {
            generation,
            result: Ok(records()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());

    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    assert!(!state.has_pending_requests());
}

#[test]
fn deactivate_twice_is_noop() {
    let (state, _) = update(AppState::new(), Msg::Deactivate);
    let (_, effects) = update(state, Msg::Deactivate);
    assert!(effects.is_empty());
}
