//! The sweep waits for *any* child of the process, so everything that sweeps runs in this one
//! test; a second test in the same binary could have its children reaped from under it.
use std::{
    thread,
    time::{Duration, Instant},
};

use smallsh::{
    common::CommandSpec,
    exec::{
        launch, sweep_background, terminate_all_background, BackgroundEvent, BackgroundRegistry,
        ExitStatus, LaunchOutcome, StatusTracker,
    },
    system::ProcessId,
};

/// Sweep until `count` events were collected or a few seconds have passed.
fn sweep_until(registry: &mut BackgroundRegistry, count: usize) -> Vec<BackgroundEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();

    while events.len() < count && Instant::now() < deadline {
        events.extend(sweep_background(registry));
        thread::sleep(Duration::from_millis(20));
    }

    events
}

fn start(
    spec: &CommandSpec,
    registry: &mut BackgroundRegistry,
    tracker: &mut StatusTracker,
) -> ProcessId {
    match launch(spec, registry, tracker) {
        LaunchOutcome::BackgroundStarted(pid) => pid,
        other => panic!("expected a background start, got {other:?}"),
    }
}

#[test]
fn background_children_are_reaped_by_the_sweep() {
    let mut registry = BackgroundRegistry::new();
    let mut tracker = StatusTracker::new();

    // nothing to reap: the sweep returns at once
    assert_eq!(sweep_background(&mut registry), vec![]);

    // a short-lived child is reported exactly once
    let spec = CommandSpec::new("true").unwrap().background(true);
    let pid = start(&spec, &mut registry, &mut tracker);
    assert!(registry.contains(pid));

    let events = sweep_until(&mut registry, 1);
    assert_eq!(
        events,
        vec![BackgroundEvent {
            pid,
            status: ExitStatus::ExitedNormally(0)
        }]
    );
    assert!(registry.is_empty());
    assert_eq!(sweep_background(&mut registry), vec![]);
    assert_eq!(
        events[0].to_string(),
        format!("background pid {pid} exited with code 0")
    );

    // the foreground status survives background completions
    let failing = CommandSpec::new("sh").unwrap().args(["-c", "exit 4"]);
    assert!(matches!(
        launch(&failing, &mut registry, &mut tracker),
        LaunchOutcome::ForegroundResult {
            status: ExitStatus::ExitedNormally(4),
            ..
        }
    ));

    let spec = CommandSpec::new("sh")
        .unwrap()
        .args(["-c", "exit 3"])
        .background(true);
    let first = start(&spec, &mut registry, &mut tracker);
    let second = start(&spec, &mut registry, &mut tracker);
    assert_eq!(registry.snapshot(), vec![first, second]);

    let mut events = sweep_until(&mut registry, 2);
    events.sort_by_key(|event| event.pid);
    let mut expected = vec![
        BackgroundEvent {
            pid: first,
            status: ExitStatus::ExitedNormally(3),
        },
        BackgroundEvent {
            pid: second,
            status: ExitStatus::ExitedNormally(3),
        },
    ];
    expected.sort_by_key(|event| event.pid);
    assert_eq!(events, expected);
    assert!(registry.is_empty());
    assert_eq!(
        tracker.last_foreground_status(),
        ExitStatus::ExitedNormally(4)
    );

    // a signalled child is reported as terminated
    let spec = CommandSpec::new("sleep").unwrap().arg("30").background(true);
    let sleeper = start(&spec, &mut registry, &mut tracker);
    let survivor = start(&spec, &mut registry, &mut tracker);
    assert_eq!(unsafe { libc::kill(sleeper.get(), libc::SIGTERM) }, 0);

    let events = sweep_until(&mut registry, 1);
    assert_eq!(
        events,
        vec![BackgroundEvent {
            pid: sleeper,
            status: ExitStatus::Terminated(libc::SIGTERM)
        }]
    );
    assert_eq!(
        events[0].to_string(),
        format!(
            "background pid {sleeper} is done: terminated by sig {}",
            libc::SIGTERM
        )
    );
    assert_eq!(registry.snapshot(), vec![survivor]);

    // exit kills what is left; the next sweep still collects it
    assert_eq!(terminate_all_background(&mut registry), 1);
    assert!(registry.is_empty());

    let events = sweep_until(&mut registry, 1);
    assert_eq!(
        events,
        vec![BackgroundEvent {
            pid: survivor,
            status: ExitStatus::Terminated(libc::SIGKILL)
        }]
    );
    assert_eq!(
        tracker.last_foreground_status(),
        ExitStatus::ExitedNormally(4)
    );
}
