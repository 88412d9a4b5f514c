/// Integration tests for an operator console session
use ugv::{
    config::Config,
    console::{CommandError, Console, Reply, describe_outcome},
};
use ugv_core::{
    geo::LatLng,
    motion::{DriveError, DriveOutcome, Frame, MotionEngine, Termination},
    observer::{RecordingNotifier, RecordingObserver},
    vehicle::{DEFAULT_START, VehicleState},
};
use ugv_waypoints::{FileStore, MemoryStore, STORAGE_KEY, WaypointError, WaypointStore};

type TestConsole = Console<MemoryStore, RecordingNotifier, RecordingObserver>;

fn console_with(backend: MemoryStore) -> TestConsole {
    Console::new(
        VehicleState::new(DEFAULT_START),
        MotionEngine::default(),
        WaypointStore::load(backend),
        RecordingNotifier::default(),
        RecordingObserver::default(),
    )
}

fn console() -> TestConsole {
    console_with(MemoryStore::new())
}

fn run(console: &mut TestConsole, line: &str) -> String {
    match console.execute_line(line) {
        Ok(Reply::Message(message)) => message,
        Ok(Reply::Quit) => panic!("unexpected quit for {line:?}"),
        Err(err) => panic!("{line:?} failed: {err}"),
    }
}

fn tick_until_finished(console: &mut TestConsole) -> DriveOutcome {
    for _ in 0..1_000_000 {
        if let Frame::Finished(outcome) = console.tick() {
            return outcome;
        }
    }
    panic!("drive never finished");
}

#[test]
fn drive_with_engine_off_warns_and_leaves_state() {
    let mut console = console();
    run(&mut console, "add harbour 59.440 24.760 h");

    let err = console.execute_line("drive h").unwrap_err();
    assert_eq!(err, CommandError::Drive(DriveError::EngineNotStarted));
    assert_eq!(console.notifier().warnings, ["engine not started"]);
    assert_eq!(console.vehicle().location, DEFAULT_START);
    assert!(console.vehicle().is_stopped());
    assert!(!console.is_driving());
    assert!(console.overlay().events.is_empty());
    assert_eq!(console.tick(), Frame::Idle);
}

#[test]
fn drives_to_saved_waypoint() {
    let mut console = console();
    run(&mut console, "add harbour 59.440 24.760 h");
    run(&mut console, "engine on");
    let reply = run(&mut console, "drive h");
    assert!(reply.starts_with("driving to harbour"), "{reply}");
    assert!(console.status().contains("driving to"));

    let outcome = tick_until_finished(&mut console);
    assert_eq!(outcome.termination, Termination::Arrived);
    assert_eq!(console.vehicle().location, LatLng::new(59.440, 24.760));
    assert_eq!(console.vehicle().speed, 0.0);
    assert_eq!(console.overlay().clear_count(), 1);
    assert!(console.notifier().warnings.is_empty());
    assert!(describe_outcome(&outcome, console.vehicle()).starts_with("arrived at"));
}

#[test]
fn second_drive_is_rejected_while_driving() {
    let mut console = console();
    run(&mut console, "add a 59.440 24.760 a");
    run(&mut console, "add b 59.450 24.770 b");
    run(&mut console, "engine on");
    run(&mut console, "drive a");
    console.tick();

    let err = console.execute_line("drive b").unwrap_err();
    assert_eq!(err, CommandError::Drive(DriveError::DriveAlreadyInProgress));

    let outcome = tick_until_finished(&mut console);
    assert_eq!(outcome.termination, Termination::Arrived);
    assert_eq!(console.vehicle().location, LatLng::new(59.440, 24.760));

    // free again once the first drive is done
    run(&mut console, "drive b");
    assert!(console.is_driving());
}

#[test]
fn engine_off_mid_drive_cancels() {
    let mut console = console();
    run(&mut console, "add far 60.0 25.0 far");
    run(&mut console, "engine on");
    run(&mut console, "drive far");
    for _ in 0..30 {
        console.tick();
    }
    assert!(console.vehicle().speed > 0.0);

    run(&mut console, "engine off");
    let frame = console.tick();
    assert!(matches!(
        frame,
        Frame::Finished(DriveOutcome {
            termination: Termination::Cancelled,
            ..
        })
    ));
    assert!(console.vehicle().is_stopped());
    assert_eq!(console.overlay().clear_count(), 1);
    assert_eq!(console.overlay().arrival_count(), 0);

    let parked = console.vehicle().location;
    assert_eq!(console.tick(), Frame::Idle);
    assert_eq!(console.vehicle().location, parked);
}

#[test]
fn stop_abandons_drive() {
    let mut console = console();
    run(&mut console, "add far 60.0 25.0 far");
    assert_eq!(run(&mut console, "stop"), "not driving");
    run(&mut console, "engine on");
    run(&mut console, "drive far");
    console.tick();
    assert_eq!(run(&mut console, "stop"), "drive abandoned");
    assert!(!console.is_driving());
    assert!(console.vehicle().is_stopped());
    assert!(console.vehicle().engine_enabled());
}

#[test]
fn waypoint_commands() {
    let mut console = console();
    assert_eq!(run(&mut console, "list"), "no waypoints");
    assert_eq!(run(&mut console, "add a 1 2 a"), "added a");

    let err = console.execute_line("add other 3 4 a").unwrap_err();
    assert_eq!(
        err,
        CommandError::Waypoint(WaypointError::DuplicateId("a".to_string()))
    );
    assert_eq!(console.waypoints().len(), 1);

    run(&mut console, "rename a pier");
    assert_eq!(console.waypoints().get("a").unwrap().name, "pier");

    let generated = run(&mut console, "add dock 5 6");
    assert_eq!(console.waypoints().len(), 2);
    assert!(generated.starts_with("added "));

    assert_eq!(run(&mut console, "remove a"), "removed a");
    assert_eq!(run(&mut console, "remove a"), "no waypoint a");
    assert_eq!(console.waypoints().len(), 1);

    let err = console.execute_line("drive a").unwrap_err();
    assert_eq!(err, CommandError::UnknownWaypoint("a".to_string()));

    assert_eq!(console.execute_line("quit"), Ok(Reply::Quit));
}

#[test]
fn storage_failure_is_reported_not_fatal() {
    let mut backend = MemoryStore::new();
    backend.set_read_only(true);
    let mut console = console_with(backend);

    assert_eq!(run(&mut console, "add a 1 2 a"), "added a");
    assert_eq!(console.waypoints().len(), 1);
    assert_eq!(console.notifier().warnings.len(), 1);
    assert!(console.notifier().warnings[0].starts_with("waypoints not saved"));
}

#[test]
fn malformed_storage_starts_empty() {
    let mut backend = MemoryStore::new();
    backend.insert(STORAGE_KEY, "not json at all");
    let console = console_with(backend);
    assert!(console.waypoints().is_empty());
}

#[test]
fn file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.dir = dir.path().display().to_string();

    let mut first = Console::from_config(
        &config,
        FileStore::new(&config.storage.dir),
        RecordingNotifier::default(),
    );
    first.execute_line("add harbour 59.44 24.76 h").unwrap();
    first.execute_line("add pier 59.45 24.77 p").unwrap();
    assert!(first.notifier().warnings.is_empty());

    let second = Console::from_config(
        &config,
        FileStore::new(&config.storage.dir),
        RecordingNotifier::default(),
    );
    assert_eq!(second.waypoints().as_slice(), first.waypoints().as_slice());
    assert_eq!(second.vehicle().location, config.vehicle.start);
    assert!(!second.vehicle().engine_enabled());
}
