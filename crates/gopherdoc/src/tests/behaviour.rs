//! Behavioural tests for the server bootstrap sequence.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{self, HealthEvent, TestWorld};

#[fixture]
fn world() -> RefCell<TestWorld> {
    support::world()
}

#[given("a healthy configuration loader")]
fn given_healthy_loader(world: &RefCell<TestWorld>) {
    let _ = world;
}

#[given("a failing configuration loader")]
fn given_failing_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_failing_loader();
}

#[given("a configuration whose corpus root does not exist")]
fn given_missing_corpus(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_missing_corpus();
}

#[given("a configuration whose listen port is already bound")]
fn given_reserved_port(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_reserved_port();
}

#[when("the server starts")]
fn when_server_starts(world: &RefCell<TestWorld>) {
    world.borrow_mut().start();
}

#[when("the server stops")]
fn when_server_stops(world: &RefCell<TestWorld>) {
    world.borrow_mut().stop();
}

#[then("bootstrap succeeds")]
fn then_bootstrap_succeeds(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    assert!(
        world.bootstrap_error().is_none(),
        "bootstrap error: {:?}",
        world.bootstrap_error()
    );
    assert!(world.is_running(), "server should be running");
}

#[then("bootstrap fails")]
fn then_bootstrap_fails(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    assert!(
        world.bootstrap_error().is_some(),
        "bootstrap succeeded unexpectedly"
    );
    assert!(!world.is_running(), "server should not be running");
}

#[then("the reporter recorded bootstrap start")]
fn then_reporter_start(world: &RefCell<TestWorld>) {
    assert!(
        world
            .borrow()
            .reporter
            .events()
            .contains(&HealthEvent::BootstrapStarting),
        "bootstrap start event missing"
    );
}

#[then("the reporter recorded bootstrap success")]
fn then_reporter_success(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    let port = world.address().port();
    let expected = HealthEvent::BootstrapSucceeded {
        host: String::from("localhost"),
        port,
    };
    let events = world.reporter.events();
    assert!(events.contains(&expected), "success event missing: {events:?}");
}

#[then("the reporter recorded bootstrap failure")]
fn then_reporter_failure(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    let failed = events
        .iter()
        .any(|event| matches!(event, HealthEvent::BootstrapFailed(_)));
    assert!(failed, "bootstrap failure event missing: {events:?}");
}

#[then("the reporter recorded the listener as ready")]
fn then_reporter_ready(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    let expected = HealthEvent::ListenerReady(world.address());
    let events = world.reporter.events();
    assert!(events.contains(&expected), "ready event missing: {events:?}");
}

#[then("the reporter recorded the listener as stopped")]
fn then_reporter_stopped(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    let stopped = events
        .iter()
        .any(|event| matches!(event, HealthEvent::ListenerStopped(_)));
    assert!(stopped, "stop event missing: {events:?}");
}

#[scenario(path = "tests/features/server_bootstrap.feature")]
fn server_bootstrap(#[from(world)] world: RefCell<TestWorld>) {
    drop(world);
}
